pub mod types;
pub mod classification;

pub use types::NablonError;
pub use classification::ErrorClassification;
