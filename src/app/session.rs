use crate::config::cli::Prompter;
use crate::core::browser::Browser;
use crate::core::render::{render_preview, render_schema, OutputFormat};
use crate::core::{Catalog, RowCap};
use crate::utils::error::{BrowserError, ErrorSeverity, Result};
use std::io::{BufRead, Write};

const NO_TABLES: &str = "⚠️ No tables found in this database.";

const HELP: &str = "Commands: <number|table> switch table, limit <N> rows to fetch (10-1000), \
schema, tables, help, quit";

/// Prints schema details and the row preview of one table. A database
/// without tables only gets the warning.
pub async fn print_table<C: Catalog, W: Write>(
    browser: &Browser<C>,
    table: &str,
    cap: RowCap,
    format: OutputFormat,
    show_schema: bool,
    out: &mut W,
) -> Result<()> {
    if !browser.has_tables() {
        writeln!(out, "{}", NO_TABLES)?;
        return Ok(());
    }

    if show_schema {
        let columns = browser.describe(table).await?;
        writeln!(out, "Schema details")?;
        writeln!(out, "{}", render_schema(&columns))?;
        writeln!(out)?;
    }

    let preview = browser.preview(table, cap).await?;
    writeln!(out, "📊 Data: {} (limit {})", preview.table, cap)?;
    writeln!(out, "{}", render_preview(&preview, format)?)?;
    Ok(())
}

/// Database and query failures are reported and the session continues;
/// anything else (broken output, config) ends it.
fn report<W: Write>(out: &mut W, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(BrowserError::DatabaseError(e)) => {
            tracing::warn!("⚠️ {}", e);
            writeln!(out, "❌ Error reading data: {}", e)?;
            Ok(())
        }
        Err(e) if e.severity() <= ErrorSeverity::Low => {
            tracing::warn!("⚠️ {}", e);
            writeln!(out, "❌ {}", e.user_friendly_message())?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

enum Step {
    Table(String),
    Tables,
    Quit,
}

/// Interactive table explorer over an open connection.
pub async fn run_explorer<C: Catalog, R: BufRead, W: Write>(
    browser: &Browser<C>,
    prompter: &mut Prompter<R, W>,
    mut cap: RowCap,
    format: OutputFormat,
) -> Result<()> {
    if !browser.has_tables() {
        prompter.say(NO_TABLES)?;
        return Ok(());
    }

    let mut step = Step::Tables;
    loop {
        let table = match step {
            Step::Quit => return Ok(()),
            Step::Table(table) => table,
            Step::Tables => {
                prompter.say("📂 Schema Explorer")?;
                for (i, table) in browser.tables().iter().enumerate() {
                    prompter.say(&format!("  {}) {}", i + 1, table))?;
                }
                match prompter.read_line("Select a Table (number or name, q to quit):")? {
                    None => return Ok(()),
                    Some(answer) if is_quit(&answer) => return Ok(()),
                    Some(answer) if answer.is_empty() => browser.tables()[0].clone(),
                    Some(answer) => match browser.resolve_table(&answer) {
                        Ok(table) => table.to_string(),
                        Err(e) => {
                            prompter.say(&format!("❌ {}", e))?;
                            step = Step::Tables;
                            continue;
                        }
                    },
                }
            }
        };

        let result = print_table(browser, &table, cap, format, true, prompter.output()).await;
        report(prompter.output(), result)?;
        step = table_commands(browser, prompter, &table, &mut cap, format).await?;
    }
}

fn is_quit(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "q" | "quit" | "exit")
}

async fn table_commands<C: Catalog, R: BufRead, W: Write>(
    browser: &Browser<C>,
    prompter: &mut Prompter<R, W>,
    table: &str,
    cap: &mut RowCap,
    format: OutputFormat,
) -> Result<Step> {
    loop {
        let Some(answer) = prompter.read_line(&format!("{}>", table))? else {
            return Ok(Step::Quit);
        };
        let mut words = answer.split_whitespace();
        let command = words.next().unwrap_or("").to_ascii_lowercase();

        match command.as_str() {
            "" => continue,
            "q" | "quit" | "exit" => return Ok(Step::Quit),
            "tables" => return Ok(Step::Tables),
            "help" | "?" => prompter.say(HELP)?,
            "schema" => {
                let result = match browser.describe(table).await {
                    Ok(columns) => prompter.say(&render_schema(&columns)),
                    Err(e) => Err(e),
                };
                report(prompter.output(), result)?;
            }
            "limit" => match words.next().map(str::parse::<u32>) {
                Some(Ok(n)) => {
                    *cap = RowCap::clamped(n);
                    if cap.get() != n {
                        prompter.say(&format!(
                            "Rows to fetch must be between {} and {}; using {}",
                            RowCap::MIN,
                            RowCap::MAX,
                            cap
                        ))?;
                    }
                    let result =
                        print_table(browser, table, *cap, format, false, prompter.output()).await;
                    report(prompter.output(), result)?;
                }
                _ => prompter.say("Usage: limit <N>")?,
            },
            _ => match browser.resolve_table(&answer) {
                Ok(next) => return Ok(Step::Table(next.to_string())),
                Err(e @ BrowserError::UnknownTable { .. }) => {
                    prompter.say(&format!("❌ {}. {}", e, HELP))?
                }
                Err(e) => return Err(e),
            },
        }
    }
}
