pub mod git_cli;
pub mod git_interface;

pub use git_cli::GitCli;
pub use git_interface::{BranchStatus, GitError, GitOperations, RemoteMap};

#[cfg(test)]
pub use git_interface::MockGitOperations;
