//! `slidedeck` - Render markdown slide decks to HTML

use clap::Parser;

use slidedeck::cli::args::Cli;
use slidedeck::cli::commands;
use slidedeck::error::ExitCode;
use slidedeck::observability::LogSettings;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let _ = LogSettings::from_cli(&cli).install();

    let result = tokio::select! {
        result = commands::dispatch(cli) => result,
        code = shutdown_signal() => {
            eprintln!("\nInterrupted");
            std::process::exit(code);
        }
    };

    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

/// Resolves with the exit code matching the first SIGINT or SIGTERM.
#[cfg(unix)]
async fn shutdown_signal() -> i32 {
    use tokio::signal::unix::{SignalKind, signal};

    let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
        let _ = tokio::signal::ctrl_c().await;
        return ExitCode::INTERRUPTED;
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => ExitCode::INTERRUPTED,
        _ = sigterm.recv() => ExitCode::TERMINATED,
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> i32 {
    let _ = tokio::signal::ctrl_c().await;
    ExitCode::INTERRUPTED
}
