//! lh - Lesson Hub identity and settings tool
//!
//! # Examples
//!
//! ```bash
//! # Check what a credential resolves to
//! lh resolve "Bearer 64a1f:admin:admin" --require-role supervisor
//!
//! # Sign in, change a setting, sign out
//! lh login "64a1f:jane:user"
//! lh set fontSize large
//! lh logout
//! ```

use lh_cli::{App, Cli, Result as CliErrorResult, logger};
use lh_config::Config;

use std::process::ExitCode;

use clap::Parser;
use log::info;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> CliErrorResult<()> {
    let config = match &cli.config_dir {
        Some(dir) => Config::load_from(dir)?,
        None => Config::load()?,
    };
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.log_file().as_deref(),
        config.logging.colored,
    )?;
    info!("Starting lh v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let app = App::from_config(&config)?;
    let result = app.run(cli.command).await;
    app.flush().await;
    let value = result?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{}", output);

    Ok(())
}
