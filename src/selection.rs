use anyhow::{Context, Result};
use inquire::{InquireError, Text};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Trait for the interactive input/output the setup flow needs
/// This allows the prompts to be driven by scripted input in tests
pub trait PromptProvider {
    /// Show a line of informational output
    fn show(&self, line: &str);

    /// Ask for a line of input. An empty answer yields `default` when given
    ///
    /// # Errors
    /// Returns an error if input cannot be read or the user interrupts the prompt
    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Ask a yes/no question where an empty answer means yes
    ///
    /// # Errors
    /// Returns an error if input cannot be read
    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(is_affirmative(&self.ask(prompt, None)?))
    }
}

/// Terminal implementation using inquire for production use
pub struct TerminalPromptProvider;

impl PromptProvider for TerminalPromptProvider {
    fn show(&self, line: &str) {
        println!("{}", line);
    }

    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut text_prompt = Text::new(prompt);
        if let Some(default) = default {
            text_prompt = text_prompt.with_default(default);
        }
        let answer = text_prompt.prompt()?;
        Ok(answer.trim().to_string())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        confirmation(Text::new(prompt).prompt())
    }
}

/// Esc at a confirmation declines it; other prompt failures are errors
fn confirmation(answer: Result<String, InquireError>) -> Result<bool> {
    match answer {
        Ok(answer) => Ok(is_affirmative(&answer)),
        Err(InquireError::OperationCanceled) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Line-based implementation over any reader and writer, used when stdin is
/// not a terminal
pub struct LinePromptProvider<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<R: BufRead, W: Write> LinePromptProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

impl<R: BufRead, W: Write> PromptProvider for LinePromptProvider<R, W> {
    fn show(&self, line: &str) {
        let _ = writeln!(self.output.borrow_mut(), "{}", line);
    }

    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        {
            let mut out = self.output.borrow_mut();
            match default {
                Some(default) => write!(out, "{} [{}] ", prompt, default)?,
                None => write!(out, "{} ", prompt)?,
            }
            out.flush()?;
        }

        let mut line = String::new();
        let read = self
            .input
            .borrow_mut()
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed before answering '{}'", prompt);
        }

        let answer = line.trim();
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer.to_string()),
        }
    }
}

/// Mock implementation for testing that replays scripted answers
#[derive(Default)]
pub struct MockPromptProvider {
    answers: RefCell<VecDeque<String>>,
    pub shown: RefCell<Vec<String>>,
    pub asked: RefCell<Vec<String>>,
}

impl MockPromptProvider {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Everything shown so far joined into one string
    pub fn transcript(&self) -> String {
        self.shown.borrow().join("\n")
    }
}

impl PromptProvider for MockPromptProvider {
    fn show(&self, line: &str) {
        self.shown.borrow_mut().push(line.to_string());
    }

    fn ask(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        let Some(answer) = self.answers.borrow_mut().pop_front() else {
            anyhow::bail!("Mock ran out of answers at prompt '{}'", prompt)
        };
        let answer = answer.trim().to_string();
        match default {
            Some(default) if answer.is_empty() => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }
}

/// Whether a confirmation answer means "go ahead". Empty counts as yes
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "" | "y" | "yes")
}
