/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Git operations through the `git` binary
/// - File system operations (repository discovery, defaults file)
/// - Process execution
pub mod filesystem;
pub mod git;
pub mod process;

// Re-export commonly used types
pub use filesystem::{ConfigStore, RepositoryLocator};
pub use git::{GitCli, GitError, GitOperations};
pub use process::CommandExecutor;
