use clap::Parser;
use remarkable_dayone::cli::commands::{export, setup, status};
use remarkable_dayone::cli::{exit_code_for, Cli, Mode, RunContext, EXIT_FATAL, EXIT_INTERRUPTED};
use remarkable_dayone::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Settings are needed before logging is up, so failures here go straight to stderr
    let settings = match cli.load_settings() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(exit_code_for(&e));
        }
    };

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| settings.application.log_level.clone());
    let log_guard = match init_logging(&log_level, &settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(exit_code_for(&e));
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?cli.mode(),
        "remarkable-dayone starting"
    );

    let ctx = match RunContext::new(&cli, settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "Path resolution failed");
            eprintln!("Error: {e}");
            process::exit(exit_code_for(&e));
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Setup and status keep the default signal behaviour
    if cli.mode() == Mode::Export {
        tokio::spawn(watch_signals(shutdown_tx));
    }

    let exit_code = match execute_command(&cli, &ctx, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    drop(log_guard);
    process::exit(exit_code);
}

/// First signal asks the export to stop between pages; a second Ctrl+C exits at once
async fn watch_signals(shutdown_tx: watch::Sender<bool>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT (Ctrl+C), stopping after the current page");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, stopping after the current page");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            return;
        }
        tracing::info!("Received SIGINT (Ctrl+C), stopping after the current page");
    }

    eprintln!("\nShutdown signal received, finishing the current page...");
    let _ = shutdown_tx.send(true);

    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("Second interrupt, exiting immediately");
        process::exit(EXIT_INTERRUPTED);
    }
}

/// Execute the selected mode
async fn execute_command(
    cli: &Cli,
    ctx: &RunContext,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    match cli.mode() {
        Mode::Setup => setup::execute(ctx),
        Mode::Status => status::execute(ctx),
        Mode::DryRun => export::execute(ctx, true, shutdown_signal).await,
        Mode::Export => export::execute(ctx, false, shutdown_signal).await,
    }
}
