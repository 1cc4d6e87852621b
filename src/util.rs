use std::io;

use anyhow::Context as _;
use rustyline::error::ReadlineError;

use crate::{error::ShellError, PROGRAM};

pub(crate) fn write_and_flush_buf<T: io::Write>(w: &mut T, buf: &[u8]) -> io::Result<()> {
    let mut buf = buf.to_owned();
    buf.push(b'\n');

    w.write_all(&buf)?;
    w.flush()
}

pub(crate) fn write_and_flush_str<T: io::Write>(w: &mut T, s: &str) -> io::Result<()> {
    write_and_flush_buf(w, s.as_bytes())
}

/// Writes the prompt marker without a trailing newline.
pub(crate) fn prompt<T: io::Write>(w: &mut T, prompt: &str) -> anyhow::Result<()> {
    w.write_all(prompt.as_bytes())
        .context("failed to write prompt")?;
    w.flush().context("failed to flush prompt")
}

/// Reads a line through the line editor. `None` means the user closed the
/// session with CTRL-D.
pub(crate) fn prompt_and_readline(
    rl: &mut rustyline::DefaultEditor,
    prompt: &str,
) -> anyhow::Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) => Ok(Some("".into())),
        Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(anyhow::anyhow!("failed to readline: {}", err)),
    }
}

/// Prints a command failure to `w` with the shell's name in front.
pub(crate) fn report<T: io::Write>(w: &mut T, err: &ShellError) {
    write_and_flush_str(w, &format!("{PROGRAM}: {err}")).ok();
}
