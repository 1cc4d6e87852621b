use std::io;

use thiserror::Error;

/// Failures a single command can hit. None of these stop the shell; the loop
/// prints them to stderr and prompts again.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("expected argument to \"{command}\"")]
    MissingArgument { command: &'static str },

    #[error("{command}: {source}")]
    Os {
        command: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl ShellError {
    pub(crate) fn os(command: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Os { command, source }
    }
}
