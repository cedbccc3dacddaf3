use crate::cli::context::AppContext;
use crate::errors::NablonError;
use crate::repl::renderer;

/// Loading the context already parsed and checked both files; report
/// what was found.
pub async fn handle_validate(config: Option<&str>, ctx: AppContext) -> Result<(), NablonError> {
    if let Some(path) = config {
        println!("{}", renderer::render_success(&format!("Configuration is valid: {}", path)));
    }

    let source = ctx
        .catalog_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    println!(
        "{}",
        renderer::render_success(&format!(
            "Fixture catalog is valid: {} ({} databases, {} questions, {} workflows)",
            source,
            ctx.catalog.databases.len(),
            ctx.catalog.questions.len(),
            ctx.catalog.workflows.len(),
        ))
    );
    Ok(())
}
