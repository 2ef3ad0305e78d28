use crate::error::{HeatError, Result};
use log::debug;
use std::process::{Command, Stdio};

/// Runs `command` to completion and returns its standard output.
///
/// Blocks until the child closes its stdout. The pipes are owned by the
/// returned `Output` and released on every path, including a failed exit.
pub fn capture_stdout(mut command: Command) -> Result<String> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!("Running {command:?}");

    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| HeatError::Process(format!("failed to run {program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HeatError::Process(format!(
            "{program} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
