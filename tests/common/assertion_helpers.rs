//! Assertion helpers for repository state

use std::path::Path;

use super::git_fixtures::git_output;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => panic!("Expected Ok, got Err: {:?}", err),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => panic!("{}: {:?}", $msg, err),
        }
    };
}

/// Assert that a result is Err and return the error
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(err) => err,
        }
    };
}

/// Assert the branch HEAD points at
pub fn assert_head(repo: &Path, expected: &str) {
    let head = git_output(repo, &["rev-parse", "--abbrev-ref", "HEAD"]);
    assert_eq!(head, expected, "unexpected HEAD in {}", repo.display());
}

/// Assert `git status --porcelain` is empty
pub fn assert_clean_work_tree(repo: &Path) {
    let status = git_output(repo, &["status", "--porcelain"]);
    assert!(status.is_empty(), "work tree of {} is dirty:\n{}", repo.display(), status);
}
