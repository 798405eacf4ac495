//! Real git repositories in a temporary directory

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run git in `dir`, panicking with its stderr on failure
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Run git in `dir` and return trimmed stdout
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git should be installed");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// A scratch directory holding repositories for one test
pub struct RepoTree {
    dir: TempDir,
}

impl RepoTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// `git init` on branch `main` with one commit
    pub fn init_repo(&self, rel: &str) -> PathBuf {
        let dir = self.path(rel);
        fs::create_dir_all(&dir).expect("create repo dir");
        git(&dir, &["init", "-q"]);
        git(&dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        configure_identity(&dir);
        commit(&dir, "README.md", "initial\n");
        dir
    }

    /// Clone `source` into `rel`; the clone tracks `origin/main`
    pub fn clone_repo(&self, source: &Path, rel: &str) -> PathBuf {
        let dir = self.path(rel);
        let source = source.to_str().expect("utf-8 path");
        let target = dir.to_str().expect("utf-8 path");
        git(self.root(), &["clone", "-q", source, target]);
        configure_identity(&dir);
        dir
    }

    /// A plain directory that is not a repository
    pub fn plain_dir(&self, rel: &str) -> PathBuf {
        let dir = self.path(rel);
        fs::create_dir_all(&dir).expect("create dir");
        dir
    }
}

pub fn commit(dir: &Path, file: &str, contents: &str) {
    fs::write(dir.join(file), contents).expect("write file");
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", file]);
}

pub fn detach_head(dir: &Path) {
    git(dir, &["checkout", "-q", "--detach"]);
}

/// Modify a tracked file and add an untracked one
pub fn make_dirty(dir: &Path) {
    fs::write(dir.join("README.md"), "changed\n").expect("write file");
    fs::write(dir.join("scratch.txt"), "untracked\n").expect("write file");
}

pub fn create_branch(dir: &Path, name: &str) {
    git(dir, &["branch", name]);
}
