pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::application::services::confirmation::Confirmation;
use crate::common::error::SgitError;
use crate::domain::entities::run_config::RunConfig;
use crate::domain::value_objects::exclusion_set::ExclusionSet;
use crate::infrastructure::filesystem::ConfigStore;
use crate::infrastructure::git::{GitCli, GitOperations};
use crate::presentation::ui::display::helpers::auto_color;
use crate::presentation::ui::prompt::TerminalConfirmation;

use commands::{
    BranchCommand, BranchView, CleanCommand, CommandContext, CommandStatus, PullCommand,
    RemoteCommand, RemoteView, SwitchCommand,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

/// sgit - run git operations across every repository under a directory
#[derive(Parser, Debug)]
#[command(name = "sgit")]
#[command(about = "Inspect and update every git repository under a directory tree")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Defaults file (otherwise <root>/.sgit.yml when present)
    #[arg(long, global = true, env = "SGIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Abort any single git invocation after this many seconds
    #[arg(long, global = true, env = "SGIT_TIMEOUT")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to look for repositories
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Root directory to search (overrides the positional path)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Comma-separated substrings; matching paths are skipped
    #[arg(short, long, value_delimiter = ',', env = "SGIT_EXCLUDE")]
    pub exclude: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current branch of every repository
    Branch {
        /// Root directory to search (defaults to current directory)
        dir: Option<PathBuf>,

        #[command(flatten)]
        scope: ScopeArgs,

        /// One table row per repository
        #[arg(short, long)]
        simple: bool,

        /// List local, remote and tag branches
        #[arg(short, long)]
        all: bool,

        /// Group repositories by branch
        #[arg(short = 'm', long)]
        summary: bool,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Show the remotes of every repository
    Remote {
        /// Root directory to search (defaults to current directory)
        dir: Option<PathBuf>,

        #[command(flatten)]
        scope: ScopeArgs,

        /// One table row per remote
        #[arg(short, long)]
        simple: bool,

        /// `path:name:url` lines for scripts
        #[arg(short, long)]
        raw: bool,
    },

    /// Fetch and pull every repository
    Pull {
        /// Root directory to search (defaults to current directory)
        dir: Option<PathBuf>,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Pull repositories concurrently
        #[arg(long)]
        parallel: bool,

        /// Number of parallel workers
        #[arg(short, long, env = "SGIT_JOBS")]
        jobs: Option<usize>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Discard local changes and untracked files
    Clean {
        /// Repository (or root directory with --recursive)
        dir: Option<PathBuf>,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,

        /// Clean every repository below the directory
        #[arg(short, long)]
        recursive: bool,

        /// Keep the target/ build directory
        #[arg(long)]
        keep_target: bool,

        /// Clean repositories concurrently
        #[arg(long)]
        parallel: bool,

        /// Number of parallel workers
        #[arg(short, long, env = "SGIT_JOBS")]
        jobs: Option<usize>,
    },

    /// Switch every repository to a branch
    Switch {
        /// Branch to switch to
        branch: String,

        #[command(flatten)]
        scope: ScopeArgs,

        /// Create the branch where it does not exist
        #[arg(short, long)]
        create: bool,

        /// Create a local branch tracking the remote branch
        #[arg(short, long)]
        track: bool,

        /// Remote used with --track
        #[arg(short, long)]
        remote: Option<String>,

        /// Fetch before creating the tracking branch
        #[arg(short, long)]
        fetch: bool,

        /// Discard local changes before switching
        #[arg(long)]
        force: bool,

        /// Only report failures, never ask
        #[arg(short, long)]
        silent: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Number of parallel workers
        #[arg(short, long, env = "SGIT_JOBS")]
        jobs: Option<usize>,
    },
}

pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        init_logging(self.cli.verbose);

        let use_color = auto_color(self.cli.no_color);
        colored::control::set_override(use_color);

        match self.handle_command(use_color).await {
            Ok(status) if status.exit_code() == 0 => Ok(()),
            Ok(status) => exit(status.exit_code()),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self, use_color: bool) -> Result<CommandStatus> {
        GitCli::new()
            .check_availability()
            .await
            .map_err(SgitError::from)?;

        match &self.cli.command {
            Commands::Branch {
                dir,
                scope,
                simple,
                all,
                summary,
                json,
            } => {
                let config = build_config(&self.cli, scope, dir.as_deref())?.with_color(use_color);
                let view = BranchView::from_flags(*simple, *all, *summary, *json);
                BranchCommand::new(view).execute(&self.context(config)).await
            }
            Commands::Remote {
                dir,
                scope,
                simple,
                raw,
            } => {
                let config = build_config(&self.cli, scope, dir.as_deref())?;
                // Raw output is consumed by scripts
                let config = config.with_color(use_color && !*raw);
                RemoteCommand::new(RemoteView::from_flags(*simple, *raw))
                    .execute(&self.context(config))
                    .await
            }
            Commands::Pull {
                dir,
                scope,
                parallel,
                jobs,
                yes,
            } => {
                let config = apply_jobs(build_config(&self.cli, scope, dir.as_deref())?, *jobs)
                    .with_parallel(*parallel)
                    .with_color(use_color);
                PullCommand::new(*yes).execute(&self.context(config)).await
            }
            Commands::Clean {
                dir,
                scope,
                force,
                recursive,
                keep_target,
                parallel,
                jobs,
            } => {
                let mut config = apply_jobs(build_config(&self.cli, scope, dir.as_deref())?, *jobs)
                    .with_parallel(*parallel)
                    .with_color(use_color);
                if *keep_target {
                    config = config.with_clean_target_dir(false);
                }
                CleanCommand::new(*force, *recursive)
                    .execute(&self.context(config))
                    .await
            }
            Commands::Switch {
                branch,
                scope,
                create,
                track,
                remote,
                fetch,
                force,
                silent,
                yes,
                jobs,
            } => {
                let mut config =
                    apply_jobs(build_config(&self.cli, scope, None)?, *jobs).with_color(use_color);
                if let Some(remote) = remote {
                    config = config.with_remote(remote.clone());
                }
                let command = SwitchCommand {
                    create: *create,
                    track: *track,
                    fetch: *fetch,
                    force: *force,
                    silent: *silent,
                    yes: *yes,
                    ..SwitchCommand::new(branch.clone())
                };
                command.execute(&self.context(config)).await
            }
        }
    }

    fn context(&self, config: RunConfig) -> CommandContext {
        let git: Arc<dyn GitOperations> =
            Arc::new(GitCli::new().with_timeout(config.timeout_seconds));
        let confirmation: Arc<dyn Confirmation> =
            Arc::new(TerminalConfirmation::new(config.use_color));
        CommandContext::new(config, git, confirmation)
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the root and merge CLI, environment and defaults file.
/// CLI values (clap already folds in the environment) beat the file.
pub fn build_config(cli: &Cli, scope: &ScopeArgs, dir: Option<&Path>) -> Result<RunConfig> {
    let root = match scope.path.as_deref().or(dir) {
        Some(path) => std::path::absolute(path)?,
        None => std::env::current_dir()?,
    };

    let mut config =
        RunConfig::new(&root).with_exclusions(ExclusionSet::from_patterns(&scope.exclude));

    if let Some(file) = ConfigStore::new()
        .load(cli.config.as_deref(), &root)
        .map_err(SgitError::from)?
    {
        config = file.apply_to(config);
    }
    if cli.timeout.is_some() {
        config = config.with_timeout(cli.timeout);
    }

    debug!(root = %config.root.display(), exclusions = ?config.exclusions.patterns(), "run configuration");
    Ok(config)
}

fn apply_jobs(config: RunConfig, jobs: Option<usize>) -> RunConfig {
    match jobs {
        Some(jobs) => config.with_workers(jobs),
        None => config,
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug for this crate with
/// `--verbose`. Logs go to stderr so stdout stays parseable.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "sgit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
