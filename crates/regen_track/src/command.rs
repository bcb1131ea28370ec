//! Blocking subprocess helper for regeneration actions.

use std::process::Command;

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The program could not be launched at all.
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        /// The program that failed to launch.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully. Both captured output
    /// streams are folded into the message so the failure is diagnosable
    /// from the error alone.
    #[error("command '{program}' exited with {status}; stderr: {stderr:?}; stdout: {stdout:?}")]
    Failed {
        /// The program that failed.
        program: String,
        /// The process exit status.
        status: std::process::ExitStatus,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },
}

/// Runs `program` with `args`, blocking until it finishes.
///
/// Both stdout and stderr are captured rather than inherited; on a non-zero
/// exit they are returned inside [`CommandError::Failed`]. Intended as the
/// body of a regeneration action:
///
/// ```no_run
/// # fn main() -> Result<(), regen_track::CommandError> {
/// regen_track::run_command("sassc", &["style.scss", "style.css"])?;
/// # Ok(())
/// # }
/// ```
pub fn run_command(program: &str, args: &[&str]) -> Result<(), CommandError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| CommandError::Spawn {
            program: program.to_string(),
            source: e,
        })?;
    if output.status.success() {
        return Ok(());
    }
    Err(CommandError::Failed {
        program: program.to_string(),
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
