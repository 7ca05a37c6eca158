//! Command-backed collaborators.

use crate::collaborators::{
    CacheInvalidator, CommandExecutor, CommandOutput, MigrationRunner, RevisionLookup,
};
use crate::deployment::ActionError;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs commands through `sh -c` in an optional working directory.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    cwd: Option<PathBuf>,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(dir.into()),
        }
    }
}

impl CommandExecutor for ShellExecutor {
    fn run(&self, command: &str) -> CommandOutput {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        log::debug!("Running command: {command}");

        match cmd.output() {
            Ok(out) => {
                let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
                output.push_str(&String::from_utf8_lossy(&out.stderr));
                CommandOutput {
                    exit_code: out.status.code().unwrap_or(-1),
                    output: output.trim_end().to_string(),
                }
            }
            Err(e) => CommandOutput {
                exit_code: -1,
                output: format!("failed to spawn: {e}"),
            },
        }
    }
}

/// Short git revision of the working tree (`git rev-parse --short HEAD`).
#[derive(Debug, Clone)]
pub struct GitRevision {
    repo: PathBuf,
}

impl GitRevision {
    pub fn new(repo: &Path) -> Self {
        Self {
            repo: repo.to_path_buf(),
        }
    }
}

impl RevisionLookup for GitRevision {
    fn short_revision(&self) -> String {
        let out = Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .current_dir(&self.repo)
            .output();
        match out {
            Ok(out) if out.status.success() => {
                String::from_utf8_lossy(&out.stdout).trim().to_string()
            }
            Ok(out) => {
                log::debug!(
                    "git rev-parse failed: {}",
                    String::from_utf8_lossy(&out.stderr).trim()
                );
                String::new()
            }
            Err(e) => {
                log::debug!("git unavailable: {e}");
                String::new()
            }
        }
    }
}

/// Runs a configured migration command; a non-zero exit is a failure.
#[derive(Debug, Clone)]
pub struct CommandMigrations {
    command: String,
    executor: ShellExecutor,
}

impl CommandMigrations {
    pub fn new(command: impl Into<String>, executor: ShellExecutor) -> Self {
        Self {
            command: command.into(),
            executor,
        }
    }
}

impl MigrationRunner for CommandMigrations {
    fn run_migrations(&self) -> Result<(), ActionError> {
        let out = self.executor.run(&self.command);
        if out.success() {
            Ok(())
        } else {
            Err(format!(
                "`{}` exited with {}: {}",
                self.command, out.exit_code, out.output
            )
            .into())
        }
    }
}

/// Cache invalidation through a configured command.
#[derive(Debug, Clone)]
pub struct CommandInvalidator {
    name: String,
    command: String,
    executor: ShellExecutor,
}

impl CommandInvalidator {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        executor: ShellExecutor,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            executor,
        }
    }
}

impl CacheInvalidator for CommandInvalidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn invalidate(&self) -> Result<(), ActionError> {
        let out = self.executor.run(&self.command);
        if out.success() {
            Ok(())
        } else {
            Err(format!("exit code {}: {}", out.exit_code, out.output).into())
        }
    }
}

/// Subcommands that rewrite the working tree, per tool.
const SCM_MUTATIONS: &[(&str, &[&str])] = &[
    (
        "git",
        &[
            "pull", "checkout", "reset", "merge", "rebase", "switch", "stash", "clean", "restore",
            "cherry-pick", "revert", "am", "apply",
        ],
    ),
    ("svn", &["update", "up", "checkout", "co", "switch", "revert", "merge"]),
    ("hg", &["pull", "update", "up", "checkout", "co", "revert", "merge", "rebase"]),
];

/// Global git options that consume the following argument.
const GIT_VALUE_OPTIONS: &[&str] = &["-C", "-c", "--git-dir", "--work-tree", "--namespace"];

/// Launchers that run the following words as the real command.
const COMMAND_WRAPPERS: &[&str] = &["sudo", "env", "command", "exec", "nohup"];

/// Wrapper options that consume the next word.
const WRAPPER_VALUE_OPTIONS: &[&str] = &[
    "-u", "-g", "-C", "-D", "-p", "--user", "--group", "--chdir", "--unset",
];

/// First word of a segment that names the program actually executed,
/// skipping `NAME=value` assignments and wrapper launchers with their options.
fn next_program<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut wrapped = false;
    while let Some(token) = tokens.next() {
        if is_assignment(token) {
            continue;
        }
        if wrapped && token.starts_with('-') {
            if WRAPPER_VALUE_OPTIONS.contains(&token) {
                tokens.next();
            }
            continue;
        }
        let program = token.rsplit('/').next().unwrap_or(token);
        if COMMAND_WRAPPERS.contains(&program) {
            wrapped = true;
            continue;
        }
        return Some(token);
    }
    None
}

fn is_assignment(token: &str) -> bool {
    match token.split_once('=') {
        Some((name, _)) => {
            !name.is_empty()
                && !name.starts_with(|c: char| c.is_ascii_digit())
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Whether `command` would mutate the source-control working tree.
///
/// Each `&&`, `||`, `;` or `|` separated segment is checked on its own.
pub fn is_scm_mutation(command: &str) -> bool {
    command
        .split(['&', '|', ';'])
        .any(|segment| segment_is_scm_mutation(segment.split_whitespace()))
}

fn segment_is_scm_mutation<'a>(mut tokens: impl Iterator<Item = &'a str>) -> bool {
    let Some(program) = next_program(&mut tokens) else {
        return false;
    };
    let program = program.rsplit('/').next().unwrap_or(program);
    let Some((_, mutations)) = SCM_MUTATIONS.iter().find(|(tool, _)| *tool == program) else {
        return false;
    };

    while let Some(token) = tokens.next() {
        if GIT_VALUE_OPTIONS.contains(&token) {
            tokens.next();
            continue;
        }
        if token.starts_with('-') {
            continue;
        }
        return mutations.contains(&token);
    }
    false
}
