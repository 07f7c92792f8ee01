//! Yes/no confirmation on a line-oriented terminal

use crate::error::HsmResult;
use std::io::{self, BufRead, Write};

/// Channel to the human operating the device.
///
/// Writing the question and reading the answer are separate steps so the
/// device can be asked to display the address in between.
pub trait Confirmer {
    /// Write a question without a trailing newline.
    fn prompt(&mut self, message: &str) -> HsmResult<()>;

    /// Block until the operator enters one line.
    fn read_line(&mut self) -> HsmResult<String>;

    /// Write an informational line.
    fn notify(&mut self, message: &str) -> HsmResult<()>;
}

/// `y` or `yes`, ignoring case and surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Confirmer bound to the process stdin/stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioConfirmer;

impl Confirmer for StdioConfirmer {
    fn prompt(&mut self, message: &str) -> HsmResult<()> {
        print!("{}", message);
        io::stdout().flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> HsmResult<String> {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    }

    fn notify(&mut self, message: &str) -> HsmResult<()> {
        println!("{}", message);
        Ok(())
    }
}

/// Confirmer over arbitrary reader/writer pairs.
#[derive(Debug)]
pub struct IoConfirmer<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> IoConfirmer<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Confirmer for IoConfirmer<R, W> {
    fn prompt(&mut self, message: &str) -> HsmResult<()> {
        write!(self.writer, "{}", message)?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> HsmResult<String> {
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line)
    }

    fn notify(&mut self, message: &str) -> HsmResult<()> {
        writeln!(self.writer, "{}", message)?;
        Ok(())
    }
}
