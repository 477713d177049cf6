//! Display models for CLI output
//!
//! Converts client types into table rows and detail sections.

pub mod display;

pub use display::{AirportDetail, AirportDisplay, HistoryDisplay};
