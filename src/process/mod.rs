//! Subprocess gateway for the PostgreSQL client tools.
//!
//! Pipelines never spawn processes directly; they go through a
//! [`CommandRunner`]. The system implementation resolves the password for
//! the connection from the credentials file and hands it to the child in
//! `PGPASSWORD`, so it never appears on a command line or in logs.

mod pgpass;
mod target;

pub use pgpass::{PassEntry, PassFile};
pub use target::ConnectionTarget;

use std::path::Path;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Environment variable the client tools read the password from
pub const PASSWORD_ENV: &str = "PGPASSWORD";

/// Tools that would otherwise stop and prompt for a password
const PROMPTING_TOOLS: &[&str] = &["psql", "pg_dump"];

/// Buffered output of a successful command, trailing whitespace trimmed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Failure to run an external command
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The command ran and exited unsuccessfully
    #[error("{command} failed ({}): {}", exit_label(.code), failure_detail(.stderr, .stdout))]
    Exit {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The command could not be started
    #[error("Failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "terminated by signal".to_string(),
    }
}

fn failure_detail<'a>(stderr: &'a str, stdout: &'a str) -> &'a str {
    if !stderr.is_empty() {
        stderr
    } else if !stdout.is_empty() {
        stdout
    } else {
        "no output"
    }
}

/// Runs external commands to completion
pub trait CommandRunner {
    /// Run `command` with `args` and extra environment `env`, blocking until it exits
    fn run(
        &self,
        command: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<CommandOutput, ProcessError>;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    passfile: Option<PassFile>,
}

impl SystemRunner {
    /// Runner using `$PGPASSFILE` or `~/.pgpass` when present
    pub fn new() -> Self {
        Self {
            passfile: PassFile::from_env_or_home(),
        }
    }

    /// Runner using an explicit credentials file
    pub fn with_passfile(passfile: PassFile) -> Self {
        Self {
            passfile: Some(passfile),
        }
    }

    /// Runner that never injects a password
    pub fn without_credentials() -> Self {
        Self { passfile: None }
    }

    fn password_for(&self, args: &[String]) -> Option<String> {
        let passfile = self.passfile.as_ref()?;
        credential_env(passfile, args).map(|(_, password)| password)
    }
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        command: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<CommandOutput, ProcessError> {
        let args = with_no_password_flag(command, args);
        debug!(command, args = %args.join(" "), "running command");

        let mut cmd = Command::new(command);
        cmd.args(&args).stdin(Stdio::null());
        cmd.envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        // A credentials-file match wins over any caller-supplied password
        if let Some(password) = self.password_for(&args) {
            cmd.env(PASSWORD_ENV, password);
        }

        let output = cmd.output().map_err(|source| ProcessError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();

        if !output.status.success() {
            return Err(ProcessError::Exit {
                command: command.to_string(),
                code: output.status.code(),
                stdout,
                stderr,
            });
        }
        Ok(CommandOutput { stdout, stderr })
    }
}

/// `PGPASSWORD` entry for the connection described by `args`, if the
/// credentials file has one.
///
/// Requires both host and user to be known.
pub fn credential_env(passfile: &PassFile, args: &[String]) -> Option<(String, String)> {
    let target = ConnectionTarget::from_args(args);
    let host = target.host.as_deref()?;
    let user = target.username.as_deref()?;
    let password = passfile.lookup(host, target.port, &target.database, user)?;
    Some((PASSWORD_ENV.to_string(), password.to_string()))
}

/// Prepend `-w` for the prompting tools unless a no-password flag is present
fn with_no_password_flag(command: &str, args: &[String]) -> Vec<String> {
    let tool = Path::new(command)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(command);
    let has_flag = args.iter().any(|a| a == "-w" || a == "--no-password");
    let mut out = Vec::with_capacity(args.len() + 1);
    if PROMPTING_TOOLS.contains(&tool) && !has_flag {
        out.push("-w".to_string());
    }
    out.extend(args.iter().cloned());
    out
}
