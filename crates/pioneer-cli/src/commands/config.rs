//! `pioneer config`: read and write project configuration files.
//!
//! Every subcommand runs on the blocking pool; configuration access is
//! plain file I/O.

use std::path::PathBuf;

use serde_json::{Value, json};
use tracing::instrument;

use pioneer_core::domain::ConfigTuple;

use crate::{
    cli::ConfigCommands,
    commands::read_file_or_stdin,
    context::AppContext,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all)]
pub async fn execute(
    cmd: ConfigCommands,
    ctx: &AppContext,
    output: &OutputManager,
) -> CliResult<()> {
    let configs = ctx.configs.clone();

    match cmd {
        ConfigCommands::Load { path } => {
            let path = ctx.absolute(&path);
            let tuple = tokio::task::spawn_blocking(move || configs.load(&path)).await??;
            output.json(&tuple)?;
        }

        ConfigCommands::Dump { path, data } => {
            let path = ctx.absolute(&path);
            let tuple = parse_tuple(&data)?;
            let sections = tuple.len();
            let shown = path.clone();
            tokio::task::spawn_blocking(move || configs.dump(&path, tuple)).await??;
            confirm(output, &format!("Wrote {sections} section(s) to {}", shown.display()))?;
        }

        ConfigCommands::Description { path, text } => {
            let path = ctx.absolute(&path);
            let shown = path.clone();
            let cleared = text.is_empty();
            tokio::task::spawn_blocking(move || configs.set_description(&path, &text)).await??;
            let verb = if cleared { "Cleared" } else { "Updated" };
            confirm(output, &format!("{verb} description of {}", shown.display()))?;
        }

        ConfigCommands::Query { path, method, args } => {
            let path = ctx.absolute(&path);
            let args = query_args(&args);
            let value =
                tokio::task::spawn_blocking(move || configs.call(&path, &method, &args)).await??;
            output.json(&value)?;
        }
    }

    Ok(())
}

fn confirm(output: &OutputManager, message: &str) -> CliResult<()> {
    if output.is_json() {
        output.json(&json!({ "ok": true }))?;
    } else {
        output.success(message)?;
    }
    Ok(())
}

/// Section data given inline, or read from stdin when `data` is `-`.
fn parse_tuple(data: &str) -> CliResult<ConfigTuple> {
    let text = if data == "-" {
        read_file_or_stdin(&PathBuf::from("-"))?
    } else {
        data.to_owned()
    };
    serde_json::from_str(&text).with_cli_context(|| "parsing configuration data")
}

/// Each argument is JSON when it parses as JSON, a plain string otherwise.
fn query_args(raw: &[String]) -> Vec<Value> {
    raw.iter()
        .map(|arg| serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.clone())))
        .collect()
}
