mod commands;
mod config;
mod main_lib;

use clap::Parser;

use commands::Commands;
use config::Config;
use main_lib::{build_state, init_tracing};

#[derive(Parser)]
#[command(
    name = "voldesk",
    about = "voldesk: daily prices and option volatility from the local broker gateway"
)]
struct Cli {
    /// Work from the local database only; gateway commands are refused.
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_tracing(&config.log_format);

    let mut state = build_state(config, cli.offline)?;
    let output = commands::run(cli.command, &mut state).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
