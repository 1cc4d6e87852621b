//! `lsh`: a small interactive shell. Each line is split into a command and
//! its arguments, run as a builtin or an external program, and waited on
//! before the next prompt.

use std::io;

pub mod builtin;
pub mod error;
pub mod launch;
pub mod reader;
pub mod tokenizer;
mod util;

use builtin::Command;
use reader::Input;

/// Name shown in front of every error message.
pub const PROGRAM: &str = "lsh";

/// Prompt printed before each line is read.
pub const DEFAULT_PROMPT: &str = "> ";

/// What the loop does after a command has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Terminate,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    /// Use the line editor when stdin is a terminal.
    pub editor: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.into(),
            editor: true,
        }
    }
}

/// Runs one line: tokenizes it, then dispatches to a builtin or launches a
/// program. Command failures are written to `err`; they never stop the loop.
pub fn execute_line<O: io::Write, E: io::Write>(line: &str, out: &mut O, err: &mut E) -> Control {
    let tokens = tokenizer::tokenize(line);
    let Some((name, args)) = tokens.split_first() else {
        return Control::Continue;
    };

    let command = Command::parse(name);
    tracing::debug!(?command, ?args, "dispatch");

    match command.execute(args, out) {
        Ok(control) => control,
        Err(e) => {
            util::report(err, &e);
            Control::Continue
        }
    }
}

/// The read/dispatch loop. Returns once `exit` runs or stdin is exhausted.
pub fn repl(config: &Config) -> anyhow::Result<()> {
    let mut input = Input::from_stdin(config.editor)?;

    loop {
        let Some(line) = input.next_line(&config.prompt)? else {
            tracing::debug!("end of input");
            return Ok(());
        };

        let control = execute_line(&line, &mut io::stdout(), &mut io::stderr());
        if control == Control::Terminate {
            return Ok(());
        }
    }
}
