//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "pioneer",
    bin_name = "pioneer",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Embedded project orchestration",
    long_about = "Pioneer lists, creates, imports and inspects PlatformIO-style \
                  embedded projects, delegating generation to the build tool.",
    after_help = "EXAMPLES:\n\
        \x20 pioneer projects ~/Projects/blink ~/Projects/weather\n\
        \x20 pioneer new blink --platform atmelavr --platform-version 4.2.0 --board uno\n\
        \x20 pioneer describe --project ~/Projects/blink --env uno\n\
        \x20 pioneer completions bash > /usr/share/bash-completion/completions/pioneer",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarise recently opened projects.
    #[command(
        visible_alias = "ls",
        about = "List recent projects",
        after_help = "Directories given on the command line are appended to the \
                      `recent_projects` setting. Missing or broken projects are skipped."
    )]
    Projects(ProjectsArgs),

    /// List examples shipped with installed packages.
    #[command(about = "List bundled examples")]
    Examples,

    /// Initialise a project for a board in an existing directory.
    #[command(
        about = "Initialise a project",
        after_help = "EXAMPLES:\n\
            \x20 pioneer init --board uno\n\
            \x20 pioneer init --board esp32dev --framework arduino ./weather"
    )]
    Init(InitArgs),

    /// Convert an Arduino sketch folder into a project.
    #[command(about = "Import an Arduino sketch")]
    ImportArduino(ImportArduinoArgs),

    /// Copy an existing project into the projects directory.
    #[command(about = "Import an existing project")]
    ImportPio(ImportPioArgs),

    /// Create a new project from a platform/board/framework selection.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 pioneer new blink --platform atmelavr --platform-version 4.2.0 --board uno\n\
            \x20 pioneer new --request request.json"
    )]
    New(NewArgs),

    /// Describe one build environment of a project.
    #[command(about = "Describe a build environment")]
    Describe(DescribeArgs),

    /// Read and write project configuration files.
    #[command(
        about = "Project configuration",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 pioneer config load ./blink\n\
            \x20 pioneer config query ./blink get env:uno board\n\
            \x20 pioneer config description ./blink \"Blinks an LED\""
    )]
    Config(ConfigCommands),

    /// Manage Pioneer's own settings.
    #[command(
        about = "Settings management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 pioneer settings get core_dir\n\
            \x20 pioneer settings list\n\
            \x20 pioneer settings init"
    )]
    Settings(SettingsCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 pioneer completions bash > ~/.local/share/bash-completion/completions/pioneer\n\
            \x20 pioneer completions zsh  > ~/.zfunc/_pioneer\n\
            \x20 pioneer completions fish > ~/.config/fish/completions/pioneer.fish"
    )]
    Completions(CompletionsArgs),
}

// ── projects ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    /// Project roots to summarise, in addition to the configured ones.
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,
}

// ── init / import ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Board identifier, e.g. `uno`.
    #[arg(short = 'b', long = "board", value_name = "ID")]
    pub board: String,

    /// Framework to pin in the project options.
    #[arg(short = 'f', long = "framework", value_name = "NAME")]
    pub framework: Option<String>,

    /// Project directory; created when missing.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct ImportArduinoArgs {
    /// Sketch folder to import.
    #[arg(value_name = "SKETCH")]
    pub sketch: PathBuf,

    /// Board identifier, e.g. `uno`.
    #[arg(short = 'b', long = "board", value_name = "ID")]
    pub board: String,

    /// Reference the Arduino IDE's library folder from the new project.
    #[arg(long = "arduino-libs")]
    pub arduino_libs: bool,
}

#[derive(Debug, Args)]
pub struct ImportPioArgs {
    /// Project directory to copy.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `pioneer new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name; the project is created at `<location>/<name>`.
    #[arg(
        value_name = "NAME",
        required_unless_present = "request",
        conflicts_with = "request"
    )]
    pub name: Option<String>,

    /// Parent directory of the project.
    #[arg(short = 'l', long = "location", value_name = "DIR", default_value = ".")]
    pub location: PathBuf,

    /// Platform name, e.g. `espressif32`.
    #[arg(
        short = 'p',
        long = "platform",
        value_name = "NAME",
        required_unless_present = "request"
    )]
    pub platform: Option<String>,

    /// Platform release to pin; empty pins nothing but the name.
    #[arg(long = "platform-version", value_name = "VERSION", default_value = "")]
    pub platform_version: String,

    /// The selected release is a pre-release; pin it exactly.
    #[arg(long = "prerelease")]
    pub prerelease: bool,

    /// Board identifier.
    #[arg(short = 'b', long = "board", value_name = "ID")]
    pub board: Option<String>,

    /// Framework name.
    #[arg(short = 'f', long = "framework", value_name = "NAME")]
    pub framework: Option<String>,

    /// Project description.
    #[arg(short = 'd', long = "description", value_name = "TEXT")]
    pub description: Option<String>,

    /// Read the whole request from a JSON file (`-` for stdin).
    #[arg(long = "request", value_name = "FILE")]
    pub request: Option<PathBuf>,

    /// Notification method tagged on streamed tool output.
    #[arg(long = "stdout-method", value_name = "METHOD")]
    pub stdout_method: Option<String>,
}

// ── describe ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Project directory.
    #[arg(short = 'p', long = "project", value_name = "DIR", default_value = ".")]
    pub project: PathBuf,

    /// Environment name, without the `env:` prefix.
    #[arg(short = 'e', long = "env", value_name = "NAME")]
    pub env: String,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `pioneer config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the literal sections of a configuration as JSON.
    Load {
        /// Configuration file or project directory.
        #[arg(value_name = "PATH", default_value = ".")]
        path: PathBuf,
    },

    /// Replace a configuration with JSON section data.
    Dump {
        /// Configuration file or project directory.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// JSON array of `[section, [[option, value], ...]]` (`-` for stdin).
        #[arg(value_name = "DATA")]
        data: String,
    },

    /// Set the project description; an empty string clears it.
    Description {
        /// Configuration file or project directory.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Run a read-only query (`get`, `envs`, `sections`, ...).
    Query {
        /// Configuration file or project directory.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[arg(value_name = "METHOD")]
        method: String,

        /// Arguments; each is parsed as JSON, falling back to a plain string.
        #[arg(value_name = "ARGS", allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

// ── settings subcommands ──────────────────────────────────────────────────────

/// Subcommands for `pioneer settings`.
#[derive(Debug, Subcommand)]
pub enum SettingsCommands {
    /// Print the value of a settings key.
    Get {
        /// Dotted key path, e.g. `output.format`.
        key: String,
    },

    /// Print all effective settings as TOML.
    List,

    /// Print the path to the settings file.
    Path,

    /// Write the effective settings to the settings file.
    Init {
        /// Overwrite an existing file.
        #[arg(long = "force")]
        force: bool,
    },
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("pioneer").chain(args.iter().copied()))
    }

    #[test]
    fn new_requires_name_and_platform_without_request() {
        assert!(parse(&["new", "blink"]).is_err());
        assert!(parse(&["new", "blink", "--platform", "atmelavr"]).is_ok());
        assert!(parse(&["new", "--request", "req.json"]).is_ok());
    }

    #[test]
    fn new_request_conflicts_with_name() {
        assert!(parse(&["new", "blink", "--platform", "x", "--request", "r.json"]).is_err());
    }

    #[test]
    fn describe_defaults_to_current_dir() {
        let cli = parse(&["describe", "--env", "uno"]).unwrap();
        match cli.command {
            Commands::Describe(args) => {
                assert_eq!(args.project, PathBuf::from("."));
                assert_eq!(args.env, "uno");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn query_args_accept_leading_hyphen() {
        let cli = parse(&["config", "query", ".", "get", "env:uno", "-1"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Query { method, args, .. }) => {
                assert_eq!(method, "get");
                assert_eq!(args, ["env:uno", "-1"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = parse(&["describe", "--env", "uno", "--output-format", "json", "-vv"]).unwrap();
        assert_eq!(cli.global.output_format, OutputFormat::Json);
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(parse(&["-q", "-v", "examples"]).is_err());
    }
}
