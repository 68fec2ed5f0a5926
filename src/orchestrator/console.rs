//! Line-oriented console I/O
//!
//! Generic over the reader and writer so a whole session can be driven from
//! memory in tests.

use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::error::{AppError, AppResult};

const CONSOLE: &str = "<console>";

pub struct Console<R, W> {
    reader: R,
    writer: W,
}

/// Console bound to the process stdin/stdout
pub fn stdio() -> Console<BufReader<Stdin>, Stdout> {
    Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print `question` and read one trimmed line; end of input reads as ""
    pub async fn ask(&mut self, question: &str) -> AppResult<String> {
        self.writer
            .write_all(question.as_bytes())
            .await
            .map_err(console_error)?;
        self.writer.flush().await.map_err(console_error)?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .await
            .map_err(console_error)?;

        Ok(line.trim().to_string())
    }

    pub async fn print_line(&mut self, line: &str) -> AppResult<()> {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(console_error)?;
        self.writer.flush().await.map_err(console_error)
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

fn console_error(source: std::io::Error) -> AppError {
    AppError::io(PathBuf::from(CONSOLE), source)
}
