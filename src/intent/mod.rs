pub mod matcher;
pub mod normalize;

pub use matcher::{CatalogEntry, IntentMatch, IntentMatcher, MatchKind, MatcherSettings, DEFAULT_TOKEN_OVERLAP_THRESHOLD};
pub use normalize::normalize;
