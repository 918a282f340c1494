#![forbid(unsafe_code)]

//! `taskdeck`: interactive terminal client for the task service.
//!
//! Loads configuration and the stored session, verifies authentication,
//! then reads one command per line until `quit`, end of input, or a
//! shutdown signal.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use taskdeck::api::http::HttpApi;
use taskdeck::app::App;
use taskdeck::commands::{execute, Command, Flow, Line};
use taskdeck::config::ClientConfig;
use taskdeck::terminal::{stdin_lines, SharedInput, TerminalUi};
use taskdeck::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "taskdeck", about = "Terminal client for the task service", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Print every review rotation as it happens.
    #[arg(long)]
    follow_reviews: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("taskdeck starting");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load_from_path(path)?,
        None => ClientConfig::default(),
    };
    config.load_credentials().await?;
    info!(base_url = %config.base_url, "configuration loaded");

    let api = Arc::new(HttpApi::new(&config)?);
    let input = stdin_lines();
    let ui = Arc::new(TerminalUi::interactive(Arc::clone(&input), args.follow_reviews));
    let app = App::new(config, api, ui);

    if app.init().await {
        info!("session ready");
    }

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
            line = next_line(&input) => {
                let Some(line) = line else { break };
                if handle_line(&app, &line, args.follow_reviews).await == Flow::Quit {
                    break;
                }
            }
        }
    }

    app.shutdown().await;
    info!("taskdeck shut down");
    Ok(())
}

async fn next_line(input: &SharedInput) -> Option<String> {
    match input.lock().await.next_line().await {
        Ok(line) => line,
        Err(err) => {
            tracing::error!(%err, "failed to read input");
            None
        }
    }
}

async fn handle_line(app: &App, line: &str, follow_reviews: bool) -> Flow {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Flow::Continue;
    }
    let command = match Line::try_parse_from(words) {
        Ok(parsed) => parsed.command,
        Err(err) => {
            let _ = err.print();
            return Flow::Continue;
        }
    };

    let shows_slide = matches!(command, Command::Reviews | Command::Next);
    match execute(app, command).await {
        Ok(flow) => {
            if shows_slide && !follow_reviews {
                TerminalUi::print_review(app.reviews().current().await.as_ref());
            }
            flow
        }
        Err(err) => {
            // Already reported through the terminal front end.
            debug!(%err, "command failed");
            Flow::Continue
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
