pub mod generator;
pub mod escalation;

pub use generator::*;
pub use escalation::*;
