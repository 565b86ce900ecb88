//! Subprocess execution.

use std::io;
use std::process::Command;

/// Errors from running an external command.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} failed ({status})")]
    Failed { program: String, status: String },
}

/// Run `command` to completion with inherited stdio.
///
/// Arguments are passed as a vector, never through a shell.
pub fn run(command: &mut Command) -> Result<(), ProcessError> {
    let program = command.get_program().to_string_lossy().into_owned();
    tracing::debug!("Running {}", describe(command));

    let status = command.status().map_err(|e| ProcessError::Spawn {
        program: program.clone(),
        source: e,
    })?;

    if !status.success() {
        return Err(ProcessError::Failed {
            program,
            status: status.to_string(),
        });
    }

    Ok(())
}

/// Human-readable command line for logs.
pub fn describe(command: &Command) -> String {
    let mut line = command.get_program().to_string_lossy().into_owned();
    for arg in command.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
