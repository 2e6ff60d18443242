use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use thiserror::Error;
use tracing::warn;

/// Raised by [`Console::read_line`] once the input stream is exhausted.
#[derive(Debug, Error)]
#[error("input stream closed")]
pub struct InputClosed;

pub fn is_input_closed(err: &anyhow::Error) -> bool {
    err.is::<InputClosed>()
}

/// Print `text`, logging instead of failing when the console cannot be written.
pub fn print_or_log<C: Console>(console: &mut C, text: &str) {
    if let Err(err) = console.print_line(text) {
        warn!("could not show message `{text}`: {err:#}");
    }
}

/// Line-based operator I/O.
pub trait Console {
    /// Show `prompt` and read one line without its line terminator.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    fn print_line(&mut self, text: &str) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    /// Re-prompt until the answer parses as `T`.
    fn prompt_number<T: FromStr>(&mut self, prompt: &str) -> Result<T>
    where
        Self: Sized,
    {
        loop {
            let answer = self.read_line(prompt)?;
            match answer.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => self.print_line(
                    "Невірний формат введення. Будь ласка, введіть ціле число.",
                )?,
            }
        }
    }

    fn pause(&mut self) -> Result<()>
    where
        Self: Sized,
    {
        self.read_line("\nНатисніть Enter, щоб продовжити...")?;
        Ok(())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool>
    where
        Self: Sized,
    {
        let answer = self.read_line(prompt)?;
        Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "т" | "так" | "y" | "yes"
        ))
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        (**self).read_line(prompt)
    }

    fn print_line(&mut self, text: &str) -> Result<()> {
        (**self).print_line(text)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

/// Console backed by the process's stdin and stdout.
pub struct Terminal {
    stdin: io::Stdin,
    stdout: io::Stdout,
    clear_screen: bool,
}

impl Terminal {
    pub fn new(clear_screen: bool) -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
            clear_screen,
        }
    }
}

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        read_answer(&mut self.stdin.lock(), &mut self.stdout, prompt)
    }

    fn print_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.stdout, "{text}")?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if self.clear_screen {
            execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))
                .context("failed to clear the terminal")?;
        }
        Ok(())
    }
}

/// Prompt on `output` and read one line from `input`.
///
/// Lines that are not valid UTF-8 are discarded and the prompt is repeated.
fn read_answer(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> Result<String> {
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => return Err(InputClosed.into()),
            Ok(_) => return Ok(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!("discarded input line: {err}");
                writeln!(
                    output,
                    "Невірне кодування введення. Будь ласка, спробуйте ще раз."
                )?;
            }
            Err(err) => return Err(err).context("failed to read from stdin"),
        }
    }
}
