//! Operator confirmation between pages

use crate::error::Result;
use std::io::{self, BufRead, Write};

/// Asks the operator a yes/no question
pub trait Confirm {
    /// Show `prompt` and return the operator's decision
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self(prompt))
    }
}

/// Line-based yes/no prompt over any reader/writer pair
///
/// An empty answer takes the default (yes). End of input answers no.
#[derive(Debug)]
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
    default: bool,
}

impl PromptConfirm<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr and read answers from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    /// Create a prompt over the given input and output
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            default: true,
        }
    }

    /// Set the answer used when the operator just presses enter
    #[must_use]
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    fn hint(&self) -> &'static str {
        if self.default {
            "[Y/n]"
        } else {
            "[y/N]"
        }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        loop {
            write!(self.output, "{prompt} {} ", self.hint())?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(false);
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "" => return Ok(self.default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please answer yes or no.")?,
            }
        }
    }
}
