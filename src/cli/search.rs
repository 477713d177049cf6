//! Interactive search over stdin
//!
//! Each input line is echoed to the store immediately and applied as the
//! query once input has been quiet for the debounce period. Every applied
//! query prints the first page of results once any fetch it triggered has
//! settled.
//!
//! Lines starting with `:` are commands instead of queries, see [`ReplCommand`].

use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::airport::{render_detail, render_page};
use crate::cli::{CommandContext, DetailTab, GlobalOptions, OutputFormat};
use crate::error::Result;
use crate::models::AirportDetail;
use crate::store::{AirportStore, Debouncer, SEARCH_DEBOUNCE, StoreState};

/// Non-query input
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Next,
    Prev,
    Page(usize),
    Show(String),
    /// Drop loaded data, query and in-memory history
    Reset,
    /// Re-fetch from the data source, skipping the persisted cache
    Refresh,
    Help,
}

impl ReplCommand {
    /// `None` for plain query text, `Err` for a malformed command
    fn parse(line: &str) -> Option<std::result::Result<Self, String>> {
        let rest = line.strip_prefix(':')?;
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        let command = match (name, arg) {
            ("next" | "n", None) => Ok(Self::Next),
            ("prev" | "p", None) => Ok(Self::Prev),
            ("page", Some(n)) => n
                .parse()
                .map(Self::Page)
                .map_err(|_| format!("Not a page number: {}", n)),
            ("show", Some(code)) => Ok(Self::Show(code.to_string())),
            ("reset", None) => Ok(Self::Reset),
            ("refresh", None) => Ok(Self::Refresh),
            ("help" | "h", None) => Ok(Self::Help),
            _ => Err(format!("Unknown command ':{}' (try :help)", rest.trim())),
        };
        Some(command)
    }
}

const HELP: &str = "\
:next, :prev      move one page
:page N           jump to page N
:show CODE        show an airport and add it to history
:reset            clear the loaded data and query
:refresh          re-fetch airports
anything else     search by IATA code or name";

pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.ensure_loaded().await?;

    let mut debouncer = query_debouncer(&ctx.store, ctx.format);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let value = line.trim().to_string();

        match ReplCommand::parse(&value) {
            None => {
                ctx.store.set_search_value(&value);
                debouncer.push(value);
            }
            Some(Err(message)) => eprintln!("{}", message),
            Some(Ok(command)) => execute(&ctx, &mut debouncer, command).await?,
        }
    }

    debouncer.finish().await;
    Ok(())
}

fn query_debouncer(store: &Arc<AirportStore>, format: OutputFormat) -> Debouncer<String> {
    let store = store.clone();
    Debouncer::new(SEARCH_DEBOUNCE, move |query: String| {
        let store = store.clone();
        async move {
            store.set_search_query(&query).await;
            print_results(&store.snapshot(), format);
        }
    })
}

fn print_results(state: &StoreState, format: OutputFormat) {
    if let Some(ref message) = state.error {
        eprintln!("{}", message);
        return;
    }
    match render_page(state, format) {
        Ok(page) => println!("{}", page),
        Err(e) => log::warn!("Failed to render results: {}", e),
    }
}

async fn execute(
    ctx: &CommandContext,
    debouncer: &mut Debouncer<String>,
    command: ReplCommand,
) -> Result<()> {
    let store = &ctx.store;
    let moved = match command {
        ReplCommand::Next => store.next_page(),
        ReplCommand::Prev => store.prev_page(),
        ReplCommand::Page(page) => store.go_to_page(page),
        ReplCommand::Show(code) => {
            match store.find_airport_by_iata(&code) {
                Some(airport) => {
                    store.add_to_search_history(&airport);
                    let detail = AirportDetail::new(&airport, DetailTab::All, Utc::now());
                    println!("{}", render_detail(&detail, ctx.format)?);
                }
                None => println!("Airport '{}' not found.", code.to_uppercase()),
            }
            return Ok(());
        }
        ReplCommand::Refresh => {
            match ctx.client.fetch_airports(None).await {
                Ok(response) => store.set_initial_data(response),
                Err(e) => eprintln!("Refresh failed: {}", e),
            }
            true
        }
        ReplCommand::Reset => {
            // A query still waiting out the debounce must not land after the reset
            std::mem::replace(debouncer, query_debouncer(store, ctx.format)).cancel();
            store.reset_store();
            println!("Store reset.");
            return Ok(());
        }
        ReplCommand::Help => {
            println!("{}", HELP);
            return Ok(());
        }
    };

    if moved {
        println!("{}", render_page(&store.snapshot(), ctx.format)?);
    } else {
        let state = store.snapshot();
        eprintln!("Page {} of {}, no change.", state.current_page, state.total_pages);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_query() {
        assert_eq!(ReplCommand::parse("heathrow"), None);
        assert_eq!(ReplCommand::parse(""), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse(":next"), Some(Ok(ReplCommand::Next)));
        assert_eq!(ReplCommand::parse(":p"), Some(Ok(ReplCommand::Prev)));
        assert_eq!(ReplCommand::parse(":page 4"), Some(Ok(ReplCommand::Page(4))));
        assert_eq!(
            ReplCommand::parse(":show jfk"),
            Some(Ok(ReplCommand::Show("jfk".to_string())))
        );
        assert_eq!(ReplCommand::parse(":refresh"), Some(Ok(ReplCommand::Refresh)));
    }

    #[test]
    fn test_parse_rejects_malformed_commands() {
        assert!(matches!(ReplCommand::parse(":page two"), Some(Err(_))));
        assert!(matches!(ReplCommand::parse(":page"), Some(Err(_))));
        assert!(matches!(ReplCommand::parse(":launch"), Some(Err(_))));
    }
}
