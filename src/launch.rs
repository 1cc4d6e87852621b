use std::process;

use crate::{error::ShellError, Control};

/// Runs an external program in the foreground and waits for it.
///
/// `name` is looked up through `PATH` by the OS. A program that can't be
/// started is an error for the caller to report; what the program itself
/// returns is only logged, never acted on.
pub fn launch(name: &str, args: &[String]) -> Result<Control, ShellError> {
    let mut child = process::Command::new(name)
        .args(args)
        .spawn()
        .map_err(|source| ShellError::Launch {
            program: name.to_owned(),
            source,
        })?;

    tracing::debug!(program = name, pid = child.id(), "launched");

    // `wait` only returns once the child has exited or been killed by a
    // signal; job-control stops don't wake it.
    let status = child.wait().map_err(|source| ShellError::Launch {
        program: name.to_owned(),
        source,
    })?;

    tracing::debug!(program = name, %status, "child finished");
    Ok(Control::Continue)
}
