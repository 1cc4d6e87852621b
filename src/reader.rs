//! Line acquisition from stdin, either as a raw byte stream or through an
//! interactive line editor when stdin is a terminal.

use std::{
    io::{self, Read},
    mem,
};

use anyhow::Context as _;
use bytes::{BufMut, BytesMut};

use crate::util;

/// Initial capacity of the line buffer, and the step it grows by.
pub const LINE_BUFSIZE: usize = 1024;

/// Pulls one line at a time out of a byte source.
pub struct LineReader<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(LINE_BUFSIZE),
        }
    }

    /// Reads bytes up to a newline or end of stream and returns them without
    /// the newline. Returns `None` only when the stream ended before any byte
    /// of a new line was read.
    ///
    /// The buffer is swapped for a fresh one on every call, so a long line
    /// doesn't stay allocated after it has been handed out.
    pub fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        self.buf.clear();
        let mut byte = [0u8; 1];

        loop {
            let n = match self.inner.read(&mut byte) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).context("failed to read input"),
            };

            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                break;
            }
            if byte[0] == b'\n' {
                break;
            }

            if self.buf.len() == self.buf.capacity() {
                self.buf.reserve(LINE_BUFSIZE);
            }
            self.buf.put_u8(byte[0]);
        }

        let line = mem::replace(&mut self.buf, BytesMut::with_capacity(LINE_BUFSIZE));
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

/// Where the loop gets its lines from.
pub enum Input {
    Stream(LineReader<io::BufReader<io::Stdin>>),
    Editor(Box<rustyline::DefaultEditor>),
}

impl Input {
    /// Uses the line editor only when asked to and stdin is a terminal.
    pub fn from_stdin(editor: bool) -> anyhow::Result<Self> {
        use std::io::IsTerminal as _;

        if editor && io::stdin().is_terminal() {
            let rl = rustyline::DefaultEditor::new()
                .context("failed to start line editor")?;
            tracing::debug!("reading input through line editor");
            return Ok(Self::Editor(Box::new(rl)));
        }

        Ok(Self::Stream(LineReader::new(io::BufReader::new(io::stdin()))))
    }

    /// Shows `prompt` and waits for the next line. `None` ends the session.
    pub fn next_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self {
            Self::Stream(reader) => {
                util::prompt(&mut io::stdout(), prompt)?;
                reader.read_line()
            }
            Self::Editor(rl) => util::prompt_and_readline(rl, prompt),
        }
    }
}
