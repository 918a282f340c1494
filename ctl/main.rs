#![forbid(unsafe_code)]

//! `taskdeck-ctl`: one-shot commands against the task service.
//!
//! Runs a single command with the stored session and exits. Suited to
//! scripts and shell aliases; the interactive client is `taskdeck`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskdeck::api::http::HttpApi;
use taskdeck::api::TodoApi;
use taskdeck::app::App;
use taskdeck::commands::{execute, Command};
use taskdeck::config::{ClientConfig, SESSION_ENV_VAR};
use taskdeck::terminal::TerminalUi;
use taskdeck::{AppError, Result};

#[derive(Debug, Parser)]
#[command(
    name = "taskdeck-ctl",
    about = "One-shot commands for the task service",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Answer yes to confirmation prompts such as delete.
    #[arg(long, short, global = true)]
    yes: bool,

    /// Star rating applied before `submit`.
    #[arg(long, global = true)]
    stars: Option<u8>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let args = Cli::parse();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to build tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load_from_path(path)?,
        None => ClientConfig::default(),
    };
    config.load_credentials().await?;

    let api = Arc::new(HttpApi::new(&config)?);
    let client: Arc<dyn TodoApi> = api.clone();
    let app = App::new(config, client, Arc::new(TerminalUi::batch(args.yes)));

    let command = args.command;
    let signs_in = matches!(command, Command::Login { .. });
    let shows_slide = matches!(command, Command::Reviews | Command::Next);
    prepare(&app, &command).await?;
    if let (Command::Submit { .. }, Some(stars)) = (&command, args.stars) {
        app.reviews().open_form().await;
        app.reviews().click_star(stars).await?;
    }

    execute(&app, command).await?;

    if shows_slide {
        TerminalUi::print_review(app.reviews().current().await.as_ref());
    }
    if signs_in {
        if let Some(cookie) = api.session_cookie() {
            println!("export {SESSION_ENV_VAR}='{cookie}'");
        }
    }
    app.shutdown().await;
    Ok(())
}

/// Verify the session when `command` needs one and load the state it
/// operates on.
async fn prepare(app: &App, command: &Command) -> Result<()> {
    if command.needs_session() && !app.session().check_auth().await {
        return Err(AppError::Unauthorized("not signed in".into()));
    }
    match command {
        Command::Done { .. } | Command::Rm { .. } | Command::Suggest => {
            app.controller().reload().await?;
        }
        Command::Next => app.reviews().load().await?,
        _ => {}
    }
    Ok(())
}
