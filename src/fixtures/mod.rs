pub mod loader;
pub mod schema;
pub mod types;

pub use loader::{load_catalog, parse_catalog};
pub use types::{Catalog, ChartKind, CuratedQuestion, DatabaseFixture, EdgeSpec, WorkflowScript, FALLBACK_ANSWER};
