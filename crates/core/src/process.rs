//! External tool execution
//!
//! Captured runs of the tools the pipeline drives: the Gradle wrapper,
//! keytool, the Flutter CLI. Output is always captured, never inherited;
//! callers decide what to surface.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Captured outcome of a finished command
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// True when the exit status was zero
    pub success: bool,
    /// Exit code, `-1` when the process was killed by a signal
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandResult {
    /// Build from a finished process's output
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Combined stdout and stderr, stderr last
    pub fn combined_output(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (true, _) => self.stderr.clone(),
            (_, true) => self.stdout.clone(),
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        }
    }

    /// Last `n` lines of stderr
    ///
    /// Gradle buries the line that matters under hundreds of stack frames;
    /// failure reports show the tail.
    pub fn stderr_tail(&self, n: usize) -> String {
        let lines: Vec<&str> = self.stderr.lines().collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].join("\n")
    }
}

/// Run a command and capture its output
pub fn run_command(program: &str, args: &[&str]) -> Result<CommandResult> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    capture(cmd, program)
}

/// Run a command from a specific working directory
pub fn run_command_in_dir(program: &str, args: &[&str], dir: &Path) -> Result<CommandResult> {
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir);
    capture(cmd, program)
}

fn capture(mut cmd: Command, program: &str) -> Result<CommandResult> {
    tracing::debug!(command = ?cmd, "running");
    let output = cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::command_not_found(program),
            _ => Error::process(format!("Failed to execute {}: {}", program, e)),
        })?;
    Ok(CommandResult::from_output(output))
}

/// True when `program` resolves on PATH
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}
