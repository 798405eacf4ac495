use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Name of the metadata directory that marks a repository root
pub const METADATA_DIR: &str = ".git";

/// A discovered repository root.
///
/// Produced once by the locator and shared read-only afterwards. The path may
/// stop being a valid repository between discovery and use; operations treat
/// that as an ordinary per-repository failure.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryRef {
    /// Absolute path of the directory containing `.git`
    pub path: PathBuf,

    /// Display name (origin repository name or directory name)
    pub name: String,

    /// Path relative to the discovery root, for display
    pub display_path: String,
}

impl RepositoryRef {
    /// Build a reference for `path`, found while walking `root`
    pub fn new(path: impl Into<PathBuf>, root: &Path) -> Self {
        let path = path.into();
        let name = Self::resolve_name(&path);
        let display_path = Self::resolve_display_path(&path, root);
        Self {
            path,
            name,
            display_path,
        }
    }

    /// Directory base name, or the full path when there is none (`/`)
    pub fn dir_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    fn resolve_display_path(path: &Path, root: &Path) -> String {
        match pathdiff::diff_paths(path, root) {
            Some(rel) if rel.as_os_str().is_empty() || rel == Path::new(".") => {
                Self::dir_name(path)
            }
            Some(rel) => rel.display().to_string(),
            None => path.display().to_string(),
        }
    }

    /// Prefer the repository name from the `origin` remote URL, falling back
    /// to the directory name.
    fn resolve_name(path: &Path) -> String {
        let config_path = path.join(METADATA_DIR).join("config");
        fs::read_to_string(config_path)
            .ok()
            .and_then(|config| origin_repo_name(&config))
            .unwrap_or_else(|| Self::dir_name(path))
    }
}

fn origin_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?m)^\s*\[remote "origin"\]\s*$(?:\n\s*[^\[\n][^\n]*)*?\n\s*url\s*=\s*(\S+)"#)
            .expect("origin url pattern is valid")
    })
}

/// Extract the repository name from the `origin` url of a git config file
pub(crate) fn origin_repo_name(config: &str) -> Option<String> {
    let url = origin_url_pattern().captures(config)?.get(1)?.as_str();
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next()?;
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

impl PartialEq for RepositoryRef {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for RepositoryRef {}

impl PartialOrd for RepositoryRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RepositoryRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl std::hash::Hash for RepositoryRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
