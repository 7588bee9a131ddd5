//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "cryptobot")]
#[command(about = "Crypto price and purchase-link chat bot for Telegram")]
#[command(version)]
pub struct Args {
    /// Run the Telegram bot
    #[arg(short, long)]
    pub telegram: bool,

    /// Read messages from the console instead of Telegram
    #[arg(short, long, conflicts_with = "telegram")]
    pub input: bool,

    /// Detach into the background before starting
    #[arg(short, long, conflicts_with = "input")]
    pub daemon: bool,

    /// Write logs to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Whether a run mode was selected at all
    pub const fn has_mode(&self) -> bool {
        self.telegram || self.input
    }
}
