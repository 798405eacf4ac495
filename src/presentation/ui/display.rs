use colored::{Color, Colorize};
use console::{pad_str, Alignment};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Display utilities for the CLI interface.
///
/// Every `format_*`/`paint` method returns plain text when color is off, so
/// renderers stay testable and `--no-color` output is stable.
#[derive(Debug, Clone, Copy)]
pub struct DisplayHelper {
    pub use_color: bool,
}

impl DisplayHelper {
    /// Create a new DisplayHelper
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "⚠".yellow().bold(), message);
        } else {
            println!("[WARNING] {}", message);
        }
    }

    /// Color `text`, or return it unchanged when color is off
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.use_color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn bold(&self, text: &str) -> String {
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success_mark(&self) -> String {
        if self.use_color {
            "✓".green().bold().to_string()
        } else {
            "[OK]".to_string()
        }
    }

    pub fn failure_mark(&self) -> String {
        if self.use_color {
            "✗".red().bold().to_string()
        } else {
            "[FAILED]".to_string()
        }
    }

    /// Format a file path with appropriate styling
    pub fn format_path(&self, path: &str) -> String {
        self.paint(path, Color::Cyan)
    }

    /// Format a branch name; detached HEAD is highlighted differently
    pub fn format_branch(&self, branch: &str, detached: bool) -> String {
        if detached {
            self.paint(branch, Color::Yellow)
        } else {
            self.paint(branch, Color::Green)
        }
    }

    /// Format a repository name with appropriate styling
    pub fn format_repo(&self, repo: &str) -> String {
        if self.use_color {
            repo.cyan().bold().to_string()
        } else {
            repo.to_string()
        }
    }

    /// Left-align possibly colored text to `width` visible columns
    pub fn pad(&self, text: &str, width: usize) -> String {
        pad_str(text, width, Alignment::Left, None).into_owned()
    }

    /// Horizontal rule of `width` columns
    pub fn separator(&self, width: usize) -> String {
        "-".repeat(width)
    }

    /// Create a progress bar for operations; hidden when color is off
    pub fn create_progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        let pb = if self.use_color {
            ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr())
        } else {
            ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden())
        };

        if self.use_color {
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>4}/{len:4} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(message.to_string());
        }

        pb
    }
}

/// Helper functions for common display patterns
pub mod helpers {
    /// Color only when stdout is a terminal and `NO_COLOR` is unset
    pub fn auto_color(no_color_flag: bool) -> bool {
        !no_color_flag && atty::is(atty::Stream::Stdout) && std::env::var_os("NO_COLOR").is_none()
    }
}
