use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::application::services::confirmation::Confirmation;

/// Asks on stdout and reads the answer from stdin. Only `y`/`yes`
/// (any case) confirms; EOF or a read error declines.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfirmation {
    use_color: bool,
}

impl TerminalConfirmation {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn read_answer(&self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        if self.use_color {
            write!(stdout, "{} {} (y/N): ", "?".yellow().bold(), prompt)?;
        } else {
            write!(stdout, "{} (y/N): ", prompt)?;
        }
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

/// Whether a typed answer counts as consent
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        self.read_answer(prompt)
            .map(|answer| is_affirmative(&answer))
            .unwrap_or(false)
    }
}
