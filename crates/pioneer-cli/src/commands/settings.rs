//! `pioneer settings`: inspect and initialise Pioneer's own settings.

use std::path::PathBuf;

use crate::{
    cli::SettingsCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct settings subcommand.
///
/// `explicit` is the file passed via `--config`, if any.
pub fn execute(
    cmd: SettingsCommands,
    config: &AppConfig,
    explicit: Option<PathBuf>,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        SettingsCommands::Get { key } => {
            let value = get_setting(config, &key)?;
            output.print(&format!("{key} = {value:?}"))?;
        }

        SettingsCommands::List => {
            if output.is_json() {
                output.json(config)?;
            } else {
                output.header("Current settings:")?;
                output.print(&to_toml(config)?)?;
            }
        }

        SettingsCommands::Path => {
            let path = explicit.unwrap_or_else(AppConfig::config_path);
            output.print(&path.display().to_string())?;
        }

        SettingsCommands::Init { force } => {
            let path = explicit.unwrap_or_else(AppConfig::config_path);
            if path.exists() && !force {
                return Err(CliError::SettingsExist { path });
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_cli_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(&path, to_toml(config)?)
                .with_cli_context(|| format!("writing {}", path.display()))?;
            output.success(&format!("Settings written to {}", path.display()))?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_setting(config: &AppConfig, key: &str) -> CliResult<String> {
    config.get(key).ok_or_else(|| CliError::ConfigError {
        message: format!("Unknown settings key: '{key}'"),
        source: None,
    })
}

fn to_toml(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise settings: {e}"),
        source: Some(Box::new(e)),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
