//! Shared CLI argument types

mod common;
mod global;

pub use common::{DetailTab, OutputFormat};
pub use global::GlobalOptions;
