use std::path::{Path, PathBuf};

use crate::domain::value_objects::exclusion_set::ExclusionSet;

/// Default number of workers in parallel mode
pub const DEFAULT_WORKERS: usize = 4;

/// Default remote used for tracking branches
pub const DEFAULT_REMOTE: &str = "origin";

/// Per-invocation configuration.
///
/// Built once from CLI flags, environment and the optional defaults file,
/// then passed by reference into every component. Nothing here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Discovery root
    pub root: PathBuf,

    /// Paths containing any of these substrings are skipped
    pub exclusions: ExclusionSet,

    /// Run repository tasks on a worker pool instead of one by one
    pub parallel: bool,

    /// Worker pool size in parallel mode
    pub workers: usize,

    /// Remote used by tracking switches
    pub remote: String,

    /// Upper bound for each git invocation
    pub timeout_seconds: Option<u64>,

    /// Remove `target/` during clean
    pub clean_target_dir: bool,

    /// Emit ANSI colors
    pub use_color: bool,
}

impl RunConfig {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclusions: ExclusionSet::new(),
            parallel: false,
            workers: DEFAULT_WORKERS,
            remote: DEFAULT_REMOTE.to_string(),
            timeout_seconds: None,
            clean_target_dir: true,
            use_color: true,
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Enable or disable the worker pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the worker count; zero is clamped to one
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_clean_target_dir(mut self, clean_target_dir: bool) -> Self {
        self.clean_target_dir = clean_target_dir;
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }
}
