//! Airport list and detail commands

use chrono::Utc;
use colored::Colorize;

use crate::cli::{CommandContext, DetailTab, GlobalOptions, OutputFormat};
use crate::error::{Error, Result};
use crate::models::{AirportDetail, AirportDisplay};
use crate::output::{PageMeta, format_json, format_json_page, format_table};
use crate::store::StoreState;

const NO_AIRPORTS: &str = "No airports found.";

/// List one page of airports, optionally filtered
pub async fn list(opts: &GlobalOptions, query: Option<&str>, page: usize) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.ensure_loaded().await?;

    if let Some(query) = query {
        apply_query(&ctx, query).await?;
    }

    if page != 1 && !ctx.store.go_to_page(page) {
        let total = ctx.store.snapshot().total_pages;
        return Err(Error::Other(format!(
            "Page {} is out of range (1-{})",
            page, total
        )));
    }

    println!("{}", render_page(&ctx.store.snapshot(), ctx.format)?);
    Ok(())
}

/// Filter the dataset. A fetch the query triggers has to succeed as well.
async fn apply_query(ctx: &CommandContext, query: &str) -> Result<()> {
    ctx.store.set_search_query(query).await;
    ctx.check_error()
}

/// Show one airport and record it in search history.
///
/// An unknown code is reported, not treated as a failure.
pub async fn show(opts: &GlobalOptions, iata: &str, tab: DetailTab) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.ensure_loaded().await?;

    let Some(airport) = ctx.store.find_airport_by_iata(iata) else {
        match ctx.format {
            OutputFormat::Json => println!("{}", format_json(&Option::<AirportDetail>::None)?),
            _ => println!("Airport '{}' not found.", iata.trim().to_uppercase()),
        }
        return Ok(());
    };

    ctx.store.add_to_search_history(&airport);

    let detail = AirportDetail::new(&airport, tab, Utc::now());
    println!("{}", render_detail(&detail, ctx.format)?);
    Ok(())
}

/// Render the current page of `state` in `format`
pub fn render_page(state: &StoreState, format: OutputFormat) -> Result<String> {
    let rows: Vec<AirportDisplay> = state.airports.iter().map(AirportDisplay::from).collect();
    let window = state.page_window();

    match format {
        OutputFormat::Json => {
            let meta = PageMeta {
                current_page: state.current_page,
                total_pages: state.total_pages,
                total_results: state.filtered_count(),
                search_query: state.search_query.clone(),
                window,
            };
            Ok(format_json_page(&rows, meta)?)
        }
        OutputFormat::Table => Ok(format_table(&rows, NO_AIRPORTS)),
        OutputFormat::Pretty => {
            let mut out = format_table(&rows, NO_AIRPORTS);
            out.push_str(&format!(
                "\n\n{}  {}",
                format_window(&window, state.current_page),
                format!("Page {} of {}", state.current_page, state.total_pages).dimmed()
            ));
            Ok(out)
        }
    }
}

/// Page buttons, current page highlighted
fn format_window(window: &[usize], current: usize) -> String {
    window
        .iter()
        .map(|&page| {
            if page == current {
                format!("[{}]", page).bold().to_string()
            } else {
                format!(" {} ", page)
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Render one airport's detail in `format`
pub fn render_detail(detail: &AirportDetail, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format_json(detail)?),
        OutputFormat::Table => {
            let rows: Vec<[String; 3]> = detail
                .sections()
                .into_iter()
                .flat_map(|(section, fields)| {
                    fields
                        .iter()
                        .map(move |f| [section.to_string(), f.label.to_string(), f.value.clone()])
                })
                .collect();
            let mut builder = tabled::builder::Builder::default();
            builder.push_record(["SECTION", "FIELD", "VALUE"]);
            for row in rows {
                builder.push_record(row);
            }
            let mut table = builder.build();
            table.with(tabled::settings::Style::rounded());
            Ok(table.to_string())
        }
        OutputFormat::Pretty => {
            let mut out = format!(
                "{} {}",
                detail.iata_code.bold().green(),
                detail.name.bold()
            );
            for (section, fields) in detail.sections() {
                out.push_str(&format!("\n\n{}", section.cyan().bold()));
                for field in fields {
                    out.push_str(&format!("\n  {:<14} {}", field.label.dimmed(), field.value));
                }
            }
            Ok(out)
        }
    }
}
