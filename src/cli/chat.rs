use crate::cli::context::AppContext;
use crate::errors::NablonError;
use crate::repl::ReplSession;

pub async fn handle_chat(ctx: AppContext) -> Result<(), NablonError> {
    ReplSession::new(ctx.catalog, &ctx.config).run().await
}
