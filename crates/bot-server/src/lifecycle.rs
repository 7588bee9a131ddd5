//! Process lifecycle: detaching, signals and in-place restart.

use std::os::unix::process::CommandExt;
use std::process::Command;

use anyhow::Context as _;
use daemonize::Daemonize;
use tokio::signal::unix::{SignalKind, signal};

/// How the process should end once the run loop stops
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shutdown {
    /// Exit with status 0
    Exit,
    /// Replace the process image with a fresh copy
    Restart,
}

/// Detach from the terminal. Must run before the tokio runtime starts.
pub fn daemonize() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    Daemonize::new()
        .working_directory(cwd)
        .start()
        .map_err(|e| anyhow::anyhow!("failed to daemonize: {e}"))
}

/// Resolve on the first of SIGTERM, Ctrl-C or SIGHUP
pub async fn wait_for_signal() -> anyhow::Result<Shutdown> {
    let mut terminate =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    let mut hangup = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;

    let shutdown = tokio::select! {
        _ = terminate.recv() => {
            tracing::info!("received SIGTERM, exiting");
            Shutdown::Exit
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, exiting");
            Shutdown::Exit
        }
        _ = hangup.recv() => {
            tracing::info!("received SIGHUP, restarting");
            Shutdown::Restart
        }
    };
    Ok(shutdown)
}

/// Re-exec the current binary with the original arguments.
/// Only returns if the exec itself failed.
pub fn restart() -> anyhow::Error {
    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => return anyhow::Error::new(e).context("failed to locate current executable"),
    };
    let err = Command::new(&exe).args(std::env::args_os().skip(1)).exec();
    anyhow::Error::new(err).context(format!("failed to re-exec {}", exe.display()))
}
