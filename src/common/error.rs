use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::branch_name::BranchNameError;
use crate::infrastructure::filesystem::config_store::ConfigStoreError;
use crate::infrastructure::filesystem::repo_locator::DiscoveryError;
use crate::infrastructure::git::GitError;

/// Errors that abort a whole invocation.
///
/// Failures scoped to one repository never surface here; they travel inside
/// [`crate::application::use_cases::task_executor::OperationResult`].
#[derive(Error, Debug)]
pub enum SgitError {
    #[error("Repository discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Not a git repository: {}\nHint: use --recursive to search subdirectories for git repositories", path.display())]
    NotARepository { path: PathBuf },

    #[error("Git operation failed: {message}")]
    GitError {
        message: String,
        #[source]
        source: Option<GitError>,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SgitError {
    pub fn not_a_repository(path: impl Into<PathBuf>) -> Self {
        Self::NotARepository { path: path.into() }
    }

    pub fn git_error_with_source(message: impl Into<String>, source: GitError) -> Self {
        Self::GitError {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            source: None,
        }
    }
}

impl From<std::io::Error> for SgitError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source(error.to_string(), None, error)
    }
}

impl From<ConfigStoreError> for SgitError {
    fn from(error: ConfigStoreError) -> Self {
        Self::config_error_with_source(error.to_string(), error)
    }
}

impl From<BranchNameError> for SgitError {
    fn from(error: BranchNameError) -> Self {
        let name = error.name.clone();
        Self::validation_error("branch", error.to_string(), Some(name))
    }
}

impl From<GitError> for SgitError {
    fn from(error: GitError) -> Self {
        Self::git_error_with_source(error.to_string(), error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::branch_name::BranchName;

    #[test]
    fn test_not_a_repository_carries_recursive_hint() {
        let error = SgitError::not_a_repository("/tmp/plain");
        let message = error.to_string();
        assert!(message.contains("/tmp/plain"));
        assert!(message.contains("--recursive"));
    }

    #[test]
    fn test_validation_error() {
        let error = SgitError::validation_error("jobs", "must be positive", Some("0".to_string()));
        assert_eq!(error.to_string(), "Validation error: jobs - must be positive");
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: SgitError = io_error.into();
        assert!(matches!(error, SgitError::FileSystemError { .. }));
    }

    #[test]
    fn test_git_error_message_is_kept() {
        let error: SgitError = GitError::SpawnFailed {
            message: "git is not installed or not in PATH".to_string(),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Git operation failed: could not run git: git is not installed or not in PATH"
        );
    }

    #[test]
    fn test_error_conversion_from_branch_name_error() {
        let error: SgitError = BranchName::new("bad..name").unwrap_err().into();
        if let SgitError::ValidationError { field, value, .. } = error {
            assert_eq!(field, "branch");
            assert_eq!(value.as_deref(), Some("bad..name"));
        } else {
            panic!("Expected ValidationError");
        }
    }
}
