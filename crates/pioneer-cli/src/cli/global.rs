//! Flags shared by every subcommand, flattened into [`super::Cli`].

use clap::Args;
use std::path::PathBuf;

/// Logging, rendering and settings-file flags.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log verbosity; `RUST_LOG` takes precedence when set.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "More log output on stderr (-v, -vv, -vvv)",
        long_help = "Log verbosity on stderr:
    (none)  - warnings and errors
    -v      - project scans, build tool runs, imports
    -vv     - skipped projects and examples, resolved packages
    -vvv    - everything, including config interpolation"
    )]
    pub verbose: u8,

    /// Silences summaries and log output below ERROR. JSON results and
    /// errors are still printed.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Print errors only"
    )]
    pub quiet: bool,

    /// Also set by `NO_COLOR` (<https://no-color.org>). The build tool is
    /// always run without colour.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Pioneer settings file (TOML). When given it must exist; otherwise the
    /// platform config directory is tried.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "PIONEER_CONFIG",
        value_name = "FILE",
        help = "Settings file (core_dir, projects_dir, pio_executable, ...)"
    )]
    pub config: Option<PathBuf>,

    /// `json` prints results in the shapes a front end consumes and switches
    /// log lines and errors to JSON as well.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Result format; `auto` defers to the output.format setting"
    )]
    pub output_format: OutputFormat,
}

/// How results are rendered on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `output.format` from the settings, else `human` on a TTY and `plain`
    /// when piped.
    #[default]
    Auto,
    /// Coloured summaries with a spinner while the build tool runs.
    Human,
    /// Uncoloured summaries, no spinner.
    Plain,
    /// Project summaries, example groups and descriptors as JSON.
    Json,
}
