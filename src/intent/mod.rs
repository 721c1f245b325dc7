pub mod types;
pub mod classifier;
pub mod catalog;

pub use types::*;
pub use classifier::*;
pub use catalog::FaqEntry;
