//! One module per subcommand. Handlers translate arguments into service
//! calls and render the result; no business logic lives here.

pub mod completions;
pub mod config;
pub mod describe;
pub mod examples;
pub mod import;
pub mod init;
pub mod new;
pub mod projects;
pub mod settings;

use std::io::Read;
use std::path::Path;

use crate::error::{CliResult, IntoCli};

/// Contents of `path`, or of stdin when `path` is `-`.
pub(crate) fn read_file_or_stdin(path: &Path) -> CliResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .with_cli_context(|| "reading standard input")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_cli_context(|| format!("reading {}", path.display()))
}
