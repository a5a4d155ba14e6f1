//! Shell command escaping and execution.

use std::process::Command;

use crate::error::{Error, Result};

/// Replacements applied by [`escape_command`] before any caller-supplied ones.
pub const DEFAULT_ESCAPES: &[(&str, &str)] = &[
    (" ", "\\ "),
    ("(", "\\("),
    (")", "\\)"),
    ("~", "$HOME"),
];

/// Make a path or command string safe for a POSIX shell.
///
/// Applies [`DEFAULT_ESCAPES`] and then `extra`, in order, each replacing
/// every occurrence.
pub fn escape_command(command: &str, extra: &[(&str, &str)]) -> String {
    DEFAULT_ESCAPES
        .iter()
        .chain(extra)
        .fold(command.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Commands and their exit statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    pub commands: Vec<String>,
    /// One status per command, `None` when the commands were not run.
    pub statuses: Option<Vec<i32>>,
}

impl CommandReport {
    pub fn was_run(&self) -> bool {
        self.statuses.is_some()
    }

    /// Number of commands that exited with a non-zero status.
    pub fn failures(&self) -> usize {
        self.statuses
            .as_ref()
            .map(|s| s.iter().filter(|code| **code != 0).count())
            .unwrap_or(0)
    }

    /// True when no command failed (including when nothing was run).
    pub fn all_succeeded(&self) -> bool {
        self.failures() == 0
    }
}

/// Runs command strings through a shell, one after another.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    shell: String,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }
}

impl CommandRunner {
    /// Use a specific shell executable (invoked as `<shell> -c <command>`).
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Run `commands` when `execute` is true, otherwise only report them.
    ///
    /// A command killed by a signal is recorded with status `-1`. Non-zero
    /// statuses are reported, not returned as errors.
    pub fn run<S: AsRef<str>>(&self, commands: &[S], execute: bool) -> Result<CommandReport> {
        let commands: Vec<String> = commands.iter().map(|c| c.as_ref().to_string()).collect();

        if !execute {
            for command in &commands {
                tracing::info!("Not running: {}", command);
            }
            return Ok(CommandReport {
                commands,
                statuses: None,
            });
        }

        let mut statuses = Vec::with_capacity(commands.len());
        for command in &commands {
            statuses.push(self.run_one(command)?);
        }

        Ok(CommandReport {
            commands,
            statuses: Some(statuses),
        })
    }

    fn run_one(&self, command: &str) -> Result<i32> {
        tracing::info!("Running: {}", command);

        let status = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|e| Error::CommandSpawn {
                command: command.to_string(),
                source: e,
            })?;

        let code = status.code().unwrap_or(-1);
        if code != 0 {
            tracing::warn!("Command exited with status {}: {}", code, command);
        }

        Ok(code)
    }
}
