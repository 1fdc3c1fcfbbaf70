pub mod types;
pub mod classification;

pub use types::DefensisError;
pub use classification::ErrorClassification;
