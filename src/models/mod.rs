pub mod finding;
pub mod plan;

pub use finding::*;
pub use plan::*;
