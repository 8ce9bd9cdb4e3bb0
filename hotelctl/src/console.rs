//! Line-oriented terminal I/O for the interactive session.
//!
//! [`Console`] owns the input reader and both output streams, so handlers
//! never touch process-global stdin/stdout and tests can drive a whole
//! session from a script.

use std::io::{self, BufRead, BufReader, Write};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::errors::{Error, Result};
use crate::types::parse_date;

pub struct Console {
    input: Box<dyn BufRead + Send>,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl Console {
    pub fn new(
        input: impl BufRead + Send + 'static,
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        Self {
            input: Box::new(input),
            out: Box::new(out),
            err: Box::new(err),
        }
    }

    /// Console over the process's standard streams.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout(), io::stderr())
    }

    /// Output stream, for rendering result tables.
    pub fn out(&mut self) -> &mut (dyn Write + Send) {
        &mut *self.out
    }

    /// Print `text` without a trailing newline and flush.
    pub fn say(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Print a line on the error stream.
    pub fn error_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.err, "{text}")?;
        self.err.flush()?;
        Ok(())
    }

    /// Read one line without its line terminator.
    ///
    /// Returns [`Error::EndOfInput`] once the input is exhausted.
    pub fn read_line(&mut self) -> Result<String> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(Error::EndOfInput);
        }
        Ok(buf.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Show `\t{label}: ` and read the answer.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        self.say(&format!("\t{label}: "))?;
        self.read_line()
    }

    /// Prompt and coerce the answer to `T`, failing with
    /// [`Error::InvalidInput`] naming `field`.
    pub fn prompt_parsed<T: FromStr>(&mut self, label: &str, field: &'static str) -> Result<T> {
        let answer = self.prompt(label)?;
        answer
            .trim()
            .parse::<T>()
            .map_err(|_| Error::invalid_input(field, answer))
    }

    /// Prompt for a date in one of the accepted formats.
    pub fn prompt_date(&mut self, label: &str, field: &'static str) -> Result<NaiveDate> {
        let answer = self.prompt(label)?;
        parse_date(&answer).ok_or_else(|| Error::invalid_input(field, answer))
    }

    /// Ask for a menu choice until a number is entered.
    pub fn read_choice(&mut self) -> Result<i64> {
        loop {
            self.say("Please make your choice: ")?;
            let answer = self.read_line()?;
            match answer.trim().parse::<i64>() {
                Ok(choice) => return Ok(choice),
                Err(_) => self.line("Your input is invalid!")?,
            }
        }
    }
}
