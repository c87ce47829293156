//! Line-oriented operator prompts.
//!
//! Both tools gather their parameters one question at a time. `Console`
//! wraps any reader/writer pair so sessions can be replayed from a buffer
//! in tests.

use std::io::{self, BufRead, StdinLock, StdoutLock, Write};

use crate::error::{HardenError, Result};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, StdoutLock<'static>> {
    /// Console bound to the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout().lock())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` without a newline and read one trimmed answer.
    ///
    /// End of input is an error: an interactive session cannot continue
    /// without an answer.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(HardenError::input(format!(
                "input closed while waiting for: {}",
                question.trim()
            )));
        }
        Ok(line.trim().to_string())
    }

    /// Yes/no question; only `y` (any case) counts as yes.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.ask(question)?.eq_ignore_ascii_case("y"))
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
