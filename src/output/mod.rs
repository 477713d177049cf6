//! Output formatting for CLI results

pub mod formatters;
pub mod json;
pub mod table;

pub use formatters::{format_size, format_timestamp_local};
pub use json::{PageMeta, format_json, format_json_page};
pub use table::format_table;
