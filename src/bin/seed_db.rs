use clap::Parser;
use db_visualizer::core::seed::{seed_database, SeedOptions, DEFAULT_DB_PATH};
use db_visualizer::utils::logger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seed-db")]
#[command(about = "Create a local SQLite database filled with demo users and orders")]
struct Args {
    /// Path of the SQLite file to create or extend
    #[arg(default_value = DEFAULT_DB_PATH)]
    path: PathBuf,

    /// Number of users to append
    #[arg(long, default_value = "100")]
    users: u32,

    /// Number of orders to append
    #[arg(long, default_value = "500")]
    orders: u32,

    /// RNG seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let options = SeedOptions {
        path: args.path,
        users: args.users,
        orders: args.orders,
        seed: args.seed,
    };

    match seed_database(&options).await {
        Ok(report) => {
            tracing::info!(
                "✅ Inserted {} users and {} orders",
                report.users_inserted,
                report.orders_inserted
            );
            println!(
                "Database '{}' created with dummy data.",
                options.path.display()
            );
        }
        Err(e) => {
            tracing::error!("❌ Seeding failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
