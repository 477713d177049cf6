//! Search history command

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::error::Result;
use crate::models::HistoryDisplay;
use crate::output::{format_json, format_table};

/// Print recently viewed airports, newest first
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let history = ctx.store.snapshot().search_history;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&history)?),
        _ => {
            let rows: Vec<HistoryDisplay> = history.iter().map(HistoryDisplay::from).collect();
            println!("{}", format_table(&rows, "No recently viewed airports."));
        }
    }

    Ok(())
}
