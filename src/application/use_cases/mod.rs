pub mod branch_summary;
pub mod clean_repositories;
pub mod inspect_branches;
pub mod inspect_remotes;
pub mod pull_repositories;
pub mod switch_branch;
pub mod task_executor;

pub use task_executor::{ExecutionSummary, OperationResult, RepositoryTask, TaskError, TaskExecutor};
