use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Failures to run a program at all. A non-zero exit is not one of these.
#[derive(Debug, Error)]
pub enum CommandExecutorError {
    #[error("{program} did not finish within {seconds} seconds")]
    Timeout { program: String, seconds: u64 },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to collect output of {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured output of a finished process
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn exit_code(&self) -> i32 {
        self.status.unwrap_or(-1)
    }

    /// What to show the user for a failed run: stderr, else stdout
    pub fn diagnostic(&self) -> String {
        match self.stderr.trim() {
            "" => self.stdout.trim().to_string(),
            stderr => stderr.to_string(),
        }
    }
}

/// Runs one external program with piped output and no stdin.
///
/// Arguments are handed to the program as-is, never through a shell.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    program: String,
    env: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl CommandExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            env: Vec::new(),
            timeout: None,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set an environment variable on every spawned process
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Kill the process and fail once `seconds` have passed
    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }

    /// Run with `args` inside `dir`
    pub async fn run(&self, args: &[&str], dir: &Path) -> Result<CommandOutput, CommandExecutorError> {
        self.spawn_and_wait(args, Some(dir)).await
    }

    /// Whether `<program> --version` starts and exits cleanly
    pub async fn is_available(&self) -> bool {
        matches!(self.spawn_and_wait(&["--version"], None).await, Ok(output) if output.success())
    }

    async fn spawn_and_wait(
        &self,
        args: &[&str],
        dir: Option<&Path>,
    ) -> Result<CommandOutput, CommandExecutorError> {
        let started = Instant::now();

        let mut command = Command::new(&self.program);
        command
            .args(args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| CommandExecutorError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| CommandExecutorError::Timeout {
                    program: self.program.clone(),
                    seconds: limit.as_secs(),
                })?,
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|source| CommandExecutorError::Wait {
            program: self.program.clone(),
            source,
        })?;

        let output = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed: started.elapsed(),
        };
        debug!(
            program = %self.program,
            status = output.exit_code(),
            elapsed_ms = output.elapsed.as_millis() as u64,
            "process exited"
        );
        Ok(output)
    }
}
