use camino::Utf8Path;
use lintbridge_types::RawOutput;
use std::process::Command;

/// What the runner does with a non-zero exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitMode {
    /// Non-zero status is an [`ExecError::NonZeroExit`].
    Raise,
    /// Any status is returned as data in [`RawOutput::status`].
    Capture,
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: i32,
        stderr: String,
    },
}

/// Runs one shell-level command line in a directory and captures its output.
///
/// Calls block until the child exits. There is no timeout: a tool that hangs blocks the caller
/// indefinitely, so hosts that need a bound must enforce it around the runner.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &str, dir: &Utf8Path, mode: ExitMode) -> Result<RawOutput, ExecError>;
}

/// Runs commands through the platform shell (`sh -c` or `cmd /C`).
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellRunner;

impl ShellRunner {
    fn shell(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, dir: &Utf8Path, mode: ExitMode) -> Result<RawOutput, ExecError> {
        tracing::debug!(%command, %dir, ?mode, "running command");

        let output = Self::shell(command)
            .current_dir(dir)
            .output()
            .map_err(|source| ExecError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let raw = RawOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(%command, status = raw.status, "command finished");

        if mode == ExitMode::Raise && !output.status.success() {
            return Err(ExecError::NonZeroExit {
                command: command.to_string(),
                status: raw.status,
                stderr: raw.stderr.trim().to_string(),
            });
        }

        Ok(raw)
    }
}
