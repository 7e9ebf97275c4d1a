//! # Pioneer CLI
//!
//! Project orchestration for embedded development.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (file + env + defaults).
//! 4. Build the [`OutputManager`].
//! 5. Wire the services and dispatch to the command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands, OutputFormat},
    config::AppConfig,
    context::AppContext,
    error::{CliError, CliResult, IntoCli},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod context;
mod error;
mod logging;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything else, tracing init included. A missing
    // file is not an error.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also land here and must exit 0.
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            eprintln!("Error: failed to load configuration: {e:#}");
            return ExitCode::from(4);
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;
    let json = cli.global.output_format == OutputFormat::Json;

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, &output).await {
        Ok(()) => {
            info!("Pioneer completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose, json),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
async fn run(cli: Cli, config: AppConfig, output: &OutputManager) -> CliResult<()> {
    // Services are only wired for commands that use them.
    let context = || -> CliResult<AppContext> {
        let cwd = std::env::current_dir().with_cli_context(|| "reading current directory")?;
        AppContext::build(&config, cwd)
    };

    match cli.command {
        Commands::Projects(args) => {
            commands::projects::execute(args, &config, &context()?, output).await
        }
        Commands::Examples => commands::examples::execute(&context()?, output).await,
        Commands::Init(args) => commands::init::execute(args, &context()?, output).await,
        Commands::ImportArduino(args) => commands::import::arduino(args, &context()?, output).await,
        Commands::ImportPio(args) => commands::import::pio(args, &context()?, output).await,
        Commands::New(args) => commands::new::execute(args, &context()?, output).await,
        Commands::Describe(args) => commands::describe::execute(args, &context()?, output).await,
        Commands::Config(cmd) => commands::config::execute(cmd, &context()?, output).await,
        Commands::Settings(cmd) => {
            commands::settings::execute(cmd, &config, cli.global.config, output)
        }
        Commands::Completions(cmd) => commands::completions::execute(cmd),
    }
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool, json: bool) -> ExitCode {
    err.log();

    // stderr, so the message survives stdout redirection.
    let msg = if json {
        format!("{}\n", err.to_json())
    } else if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
