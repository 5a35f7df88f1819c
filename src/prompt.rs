//! Interactive terminal prompting
//!
//! Business logic treats prompting as an ordinary call returning a line of
//! text; the Prompter seam keeps the orchestrator testable with scripted
//! answers.

use std::io::{self, BufRead, Write};

/// Ask a question, get a line of text
pub trait Prompter: Send + Sync {
    fn ask(&self, question: &str) -> io::Result<String>;
}

/// Production prompter over stdin/stdout
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for StdinPrompter {
    fn ask(&self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{} ", question)?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// Yes/no question: case-insensitive `y`/`yes` is affirmative, anything
/// else (including an empty line) is negative
pub fn confirm(prompter: &dyn Prompter, question: &str) -> io::Result<bool> {
    let answer = prompter.ask(&format!("{} (y/N):", question))?;
    let answer = answer.to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Parses a space-separated list of 1-based indices.
///
/// Non-numeric tokens and out-of-range indices are ignored rather than
/// rejected, so one typo does not discard the whole selection.
pub fn parse_selection(input: &str, len: usize) -> Vec<usize> {
    input
        .split_whitespace()
        .filter_map(|token| token.parse::<usize>().ok())
        .filter(|&n| n >= 1 && n <= len)
        .map(|n| n - 1)
        .collect()
}
