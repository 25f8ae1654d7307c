use clap::Parser;
use db_visualizer::app::{print_table, run_explorer};
use db_visualizer::config::cli::{prompt_connection, Prompter};
use db_visualizer::core::connection_string::{connection_string, redacted};
use db_visualizer::utils::{logger, validation::Validate};
use db_visualizer::{Browser, BrowserConfig, BrowserError, CliConfig};
use std::io::{self, Write};

fn exit_with(e: &BrowserError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting db-visualizer");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        exit_with(&e);
    }

    let config = match BrowserConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let settings = match prompt_connection(&mut prompter, &config.connection) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    if let Ok(uri) = connection_string(&settings) {
        tracing::debug!("Connection string: {}", redacted(&uri));
    }

    let browser = match Browser::open(&settings).await {
        Ok(browser) => browser,
        Err(e) => exit_with(&e),
    };
    println!("✅ Connected to {}", browser.label());

    let result = match &config.table {
        Some(table) => {
            let mut stdout = io::stdout();
            let result =
                print_table(&browser, table, config.row_cap, config.format, true, &mut stdout)
                    .await;
            stdout.flush()?;
            result
        }
        None => run_explorer(&browser, &mut prompter, config.row_cap, config.format).await,
    };

    browser.close().await;

    if let Err(e) = result {
        exit_with(&e);
    }

    Ok(())
}
