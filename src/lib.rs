//! # sgit - git across many repositories
//!
//! `sgit` finds every git repository below a directory and runs the same
//! operation on each of them: report branches or remotes, pull, clean, or
//! switch branches. A failure in one repository never stops the others; each
//! command ends with a per-repository report and a success tally.
//!
//! ## Quick Start
//!
//! ```bash
//! sgit branch ~/src --summary
//! sgit remote ~/src --raw
//! sgit pull ~/src --parallel --jobs 8
//! sgit switch release/1.2 --path ~/src --track --fetch
//! sgit clean ~/src --recursive --force
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: repository references, branch names, exclusion sets and the
//!   per-invocation [`domain::entities::run_config::RunConfig`]
//! - [`infrastructure`]: repository discovery, the `git` process adapter and
//!   the optional `.sgit.yml` defaults file
//! - [`application`]: the [`application::use_cases::task_executor::TaskExecutor`]
//!   that fans a task out over repositories, the branch switch state machine
//!   and the branch summary
//! - [`presentation`]: clap command tree and terminal rendering
//! - [`common`]: crate-wide error type
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sgit::application::services::discover_repositories;
//! use sgit::application::use_cases::inspect_branches::InspectBranchesTask;
//! use sgit::application::use_cases::TaskExecutor;
//! use sgit::domain::entities::run_config::RunConfig;
//! use sgit::infrastructure::GitCli;
//!
//! # async fn example() -> sgit::Result<()> {
//! let config = RunConfig::new("/src").with_parallel(true);
//! let repos = discover_repositories(&config).await?;
//!
//! let task = InspectBranchesTask::new(Arc::new(GitCli::new()));
//! for result in TaskExecutor::from_config(&config).run_all(&repos, Arc::new(task)).await {
//!     match &result.outcome {
//!         Ok(info) => println!("{}: {}", result.repository.display_path, info.branch),
//!         Err(e) => println!("{}: {}", result.repository.display_path, e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use crate::common::error::SgitError;
pub use crate::common::result::SgitResult as Result;
