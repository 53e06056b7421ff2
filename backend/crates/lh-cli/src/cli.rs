use crate::commands::Commands;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "lh")]
#[command(about = "Lesson Hub identity and settings tool")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory (defaults to $LH_CONFIG_DIR, then ./.lh)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
