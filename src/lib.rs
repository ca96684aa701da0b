pub use lrzero_core::*;

pub mod cli;
pub mod report;
