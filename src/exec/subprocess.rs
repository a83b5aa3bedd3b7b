//! Subprocess execution
//!
//! Commands are ordered token lists constructed fresh per phase. A nonzero
//! exit is fatal to the whole run; the failing command line is logged before
//! the error propagates.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};

use crate::error::{hints, DobuildError};
use crate::utils::terminal;

/// How much of a child process's output reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Child stdout inherited; child stderr copied onto this process's
    /// stdout. Some tools (apt among them) chat on stderr without failing,
    /// and CI log scrapers treat stderr output as an error.
    Verbose,
    /// Both streams discarded.
    Quiet,
}

/// Run a command, raising on nonzero exit.
pub fn run_command(command: &[String], verbosity: Verbosity) -> Result<()> {
    let (program, args) = match command.split_first() {
        Some(parts) => parts,
        None => bail!("Cannot run an empty command"),
    };
    let command_line = command.join(" ");
    println!("Running command {command_line}");

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());

    let status = match verbosity {
        Verbosity::Quiet => {
            cmd.stdout(Stdio::null());
            cmd.stderr(Stdio::null());
            cmd.status()
                .with_context(|| format!("Failed to execute {program}"))?
        }
        Verbosity::Verbose => {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::piped());
            let mut child = cmd
                .spawn()
                .with_context(|| format!("Failed to execute {program}"))?;
            if let Some(mut stderr) = child.stderr.take() {
                io::copy(&mut stderr, &mut io::stdout())
                    .context("Failed to forward child stderr")?;
            }
            child
                .wait()
                .with_context(|| format!("Failed to wait for {program}"))?
        }
    };

    if !status.success() {
        terminal::print_error(&format!("Running {command_line} failed"));
        return Err(DobuildError::CommandFailed {
            command: command_line,
            code: status.code().unwrap_or(-1),
        }
        .into());
    }
    Ok(())
}

/// Run a command without interpreting its exit code.
///
/// Used for the test executable: a failure to spawn is still an error, but
/// whatever status the tests exit with is the tests' own business.
pub fn run_unchecked(command: &[String]) -> Result<()> {
    let (program, args) = match command.split_first() {
        Some(parts) => parts,
        None => bail!("Cannot run an empty command"),
    };
    println!("Running command {}", command.join(" "));
    Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("Failed to execute {program}"))?;
    Ok(())
}

/// Locate the cmake executable on PATH.
pub fn find_cmake() -> Result<PathBuf> {
    which::which("cmake").map_err(|_| {
        anyhow::Error::from(DobuildError::MissingTool {
            tool: "cmake".to_string(),
            hint: hints::cmake().to_string(),
        })
    })
}
