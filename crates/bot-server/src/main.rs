//! cryptobot
//!
//! Telegram group bot that answers crypto price and purchase questions.
//! A console mode (`-i`) drives the same pipeline from stdin.
//!
//! Process lifecycle: SIGTERM and Ctrl-C exit cleanly, SIGHUP restarts the
//! process in place, `-d` detaches into the background.

mod cli;
mod config;
mod console;
mod dispatcher;
mod lifecycle;
mod logging;
mod state;
mod telegram;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{CommandFactory, Parser};

use crate::cli::Args;
use crate::config::BotConfig;
use crate::lifecycle::Shutdown;
use crate::state::AppState;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if !args.has_mode() {
        Args::command().print_help()?;
        return Ok(());
    }

    // Load environment
    dotenvy::dotenv().ok();
    let config = BotConfig::from_env().context("invalid configuration")?;
    if args.telegram {
        config.telegram_token()?;
    }

    let log_file = args
        .log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .or_else(|| args.daemon.then(|| PathBuf::from(logging::DEFAULT_DAEMON_LOG)));

    // Fork before any threads exist
    if args.daemon {
        lifecycle::daemonize()?;
    }

    let guard = logging::init(log_file.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;
    let shutdown = runtime.block_on(run(&args, &config));
    // A pending stdin read would block a regular drop
    runtime.shutdown_background();
    let shutdown = shutdown?;

    match shutdown {
        Shutdown::Exit => Ok(()),
        Shutdown::Restart => {
            drop(guard);
            Err(lifecycle::restart())
        }
    }
}

async fn run(args: &Args, config: &BotConfig) -> anyhow::Result<Shutdown> {
    let state = AppState::from_config(config)?;
    state.check_provider().await;

    if args.telegram {
        let (bot, username) = telegram::connect(config.telegram_token()?).await?;
        let dispatcher = Arc::new(state.dispatcher(&username));

        tokio::select! {
            () = telegram::run(bot, dispatcher) => Ok(Shutdown::Exit),
            signal = lifecycle::wait_for_signal() => signal,
        }
    } else {
        tracing::info!("console mode, type a message and press enter");
        let dispatcher = state.dispatcher("");

        tokio::select! {
            result = console::run(&dispatcher) => result.map(|()| Shutdown::Exit),
            signal = lifecycle::wait_for_signal() => signal,
        }
    }
}
