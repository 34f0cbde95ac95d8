//! External command execution.
//!
//! Every package-manager invocation goes through [`CommandRunner`] so that the
//! reconciliation logic can be exercised without touching the host system.

use anyhow::{Context, Result};
use duct::cmd;
use std::fmt;

use crate::common::shell::join_command;
use crate::ui::prelude::*;

/// A program plus its arguments, built by the providers and executed by a runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_command(&self.program, &self.args))
    }
}

/// Capability to run external commands.
///
/// Calls block until the command exits. Nothing is ever run concurrently.
pub trait CommandRunner {
    /// Whether `program` resolves on PATH.
    fn has_command(&self, program: &str) -> bool;

    /// Run with the terminal attached. Fails on spawn errors and non-zero exits.
    fn run(&self, command: &CommandLine) -> Result<()>;

    /// Run and capture stdout. Fails on spawn errors and non-zero exits.
    fn read(&self, command: &CommandLine) -> Result<String>;
}

/// Runs commands on the host through `duct`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn has_command(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn run(&self, command: &CommandLine) -> Result<()> {
        emit(Level::Debug, "exec.run", &format!("$ {}", command), None);
        cmd(&command.program, &command.args)
            .run()
            .with_context(|| format!("`{}` failed", command))?;
        Ok(())
    }

    fn read(&self, command: &CommandLine) -> Result<String> {
        emit(Level::Debug, "exec.read", &format!("$ {}", command), None);
        cmd(&command.program, &command.args)
            .stderr_null()
            .read()
            .with_context(|| format!("`{}` failed", command))
    }
}

/// Stand-in for a host that is not the one being described.
///
/// Used when `--distro` names another distribution: nothing is on PATH, so
/// every installed-state listing comes back empty, and nothing can run.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedRunner;

impl CommandRunner for DetachedRunner {
    fn has_command(&self, _program: &str) -> bool {
        false
    }

    fn run(&self, command: &CommandLine) -> Result<()> {
        anyhow::bail!("`{}` not run: the target is not this host", command)
    }

    fn read(&self, command: &CommandLine) -> Result<String> {
        anyhow::bail!("`{}` not run: the target is not this host", command)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingRunner;
    use super::*;

    #[test]
    fn test_command_line_display() {
        let line = CommandLine::new("snap")
            .arg("install")
            .args(["code", "--classic"]);
        assert_eq!(line.to_string(), "snap install code --classic");
    }

    #[test]
    fn test_recording_runner_scripts() {
        let runner = RecordingRunner::new()
            .with_commands(&["snap"])
            .with_output("snap list", "Name Version\ncore 16\n")
            .failing("snap remove");

        assert!(runner.has_command("snap"));
        assert!(!runner.has_command("flatpak"));
        assert_eq!(
            runner.read(&CommandLine::new("snap").arg("list")).unwrap(),
            "Name Version\ncore 16\n"
        );
        assert!(runner.run(&CommandLine::new("snap").args(["remove", "x"])).is_err());
        assert_eq!(runner.calls(), vec!["snap list", "snap remove x"]);
    }

    #[test]
    fn test_detached_runner_runs_nothing() {
        let runner = DetachedRunner;
        assert!(!runner.has_command("pacman"));
        assert!(runner.read(&CommandLine::new("pacman").arg("-Qq")).is_err());
        assert!(runner.run(&CommandLine::new("pacman").arg("-Syu")).is_err());
    }

    #[test]
    fn test_system_runner_reports_missing_program() {
        let runner = SystemRunner;
        assert!(!runner.has_command("definitely-does-not-exist-12345"));
        let result = runner.read(&CommandLine::new("definitely-does-not-exist-12345"));
        assert!(result.is_err());
    }
}
