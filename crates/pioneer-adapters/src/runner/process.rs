//! Runs the external build tool as a child process.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use pioneer_core::{
    application::{
        ApplicationError,
        ports::{ColorMode, CoreRunner, ExecOutput, SpawnOptions},
    },
    error::PioneerResult,
};
use tokio::process::Command;
use tracing::{debug, instrument};

/// [`CoreRunner`] spawning `executable` with [`tokio::process`].
///
/// Every run is out-of-process, so `force_subprocess` needs no special
/// handling here.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    executable: PathBuf,
}

impl ProcessRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.executable.display().to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new("pio")
    }
}

#[async_trait]
impl CoreRunner for ProcessRunner {
    #[instrument(skip(self, options), fields(cwd = %options.working_dir.display()))]
    async fn exec(&self, args: Vec<String>, options: SpawnOptions) -> PioneerResult<ExecOutput> {
        let command_line = self.command_line(&args);
        debug!(command = %command_line, "Spawning build tool");

        let mut cmd = Command::new(&self.executable);
        cmd.args(&args)
            .current_dir(&options.working_dir)
            .envs(&options.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        match options.color {
            ColorMode::Auto => {}
            ColorMode::Off => {
                cmd.env("PLATFORMIO_NO_ANSI", "true");
            }
            ColorMode::Force => {
                cmd.env("PLATFORMIO_FORCE_ANSI", "true");
            }
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| ApplicationError::ExternalTool {
                command: command_line.clone(),
                reason: format!("failed to start: {e}"),
            })?;

        let result = ExecOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !output.status.success() {
            let detail = result.stderr.trim();
            let detail = if detail.is_empty() {
                result.stdout.trim()
            } else {
                detail
            };
            return Err(ApplicationError::ExternalTool {
                command: command_line,
                reason: format!("exit code {}: {detail}", result.exit_code),
            }
            .into());
        }
        debug!(exit_code = result.exit_code, "Build tool finished");
        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn captures_stdout_of_successful_run() {
        let tmp = TempDir::new().unwrap();
        let runner = ProcessRunner::new("sh");
        let out = runner
            .exec(
                vec!["-c".into(), "pwd; echo $PLATFORMIO_NO_ANSI".into()],
                SpawnOptions::dispatched(tmp.path(), BTreeMap::new()),
            )
            .await
            .unwrap();

        let lines: Vec<&str> = out.stdout.lines().collect();
        assert_eq!(
            std::fs::canonicalize(lines[0]).unwrap(),
            std::fs::canonicalize(tmp.path()).unwrap()
        );
        assert_eq!(lines[1], "true");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = ProcessRunner::new("sh")
            .exec(
                vec!["-c".into(), "echo broken >&2; exit 3".into()],
                SpawnOptions::subprocess(tmp.path()),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("broken"), "{err}");
    }

    #[tokio::test]
    async fn missing_executable_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = ProcessRunner::new("/definitely/not/here")
            .exec(vec![], SpawnOptions::subprocess(tmp.path()))
            .await;
        assert!(result.is_err());
    }
}
