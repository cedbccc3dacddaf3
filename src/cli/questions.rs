use crate::cli::commands::QuestionsArgs;
use crate::cli::context::AppContext;
use crate::errors::NablonError;
use crate::repl::renderer;

pub async fn handle_questions(args: QuestionsArgs, ctx: AppContext) -> Result<(), NablonError> {
    if let Some(db) = &args.db {
        if ctx.catalog.database(db).is_none() {
            return Err(NablonError::InvalidInput(format!("Unknown database: {}", db)));
        }
    }

    let found = match &args.search {
        Some(text) => ctx.catalog.search(text, args.db.as_deref()),
        None => ctx.catalog.questions_for(args.db.as_deref()),
    };
    println!("{}", renderer::render_questions(&found));
    Ok(())
}
