use serde_json::json;

use crate::cli::commands::MatchArgs;
use crate::cli::context::AppContext;
use crate::errors::NablonError;
use crate::intent::IntentMatcher;
use crate::repl::renderer;

pub async fn handle_match(args: MatchArgs, ctx: AppContext) -> Result<(), NablonError> {
    let matcher = IntentMatcher::new(ctx.config.matcher_settings());
    let found = matcher.find(&args.query, &ctx.catalog.workflows);

    if args.json {
        let body = match &found {
            Some(m) => json!({
                "query": args.query,
                "question": m.entry.question,
                "index": m.index,
                "match": m.kind,
            }),
            None => json!({ "query": args.query, "match": null }),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let summary = found.as_ref().map(|m| (m.entry.question.as_str(), m.kind));
        println!("{}", renderer::render_match(&args.query, summary));
    }
    Ok(())
}
