pub mod display;
pub mod progress;
pub mod prompt;

pub use display::DisplayHelper;
pub use progress::RepositoryProgress;
pub use prompt::TerminalConfirmation;
