//! Process-launcher seam.
//!
//! Invoke is fire-and-forget: the substituted command line is handed to the
//! OS and the child is never waited on or tracked. The trait exists so the
//! command logic can record launches in tests; the Windows adapter passes
//! the raw command line to `CreateProcessW`, while [`DetachedLauncher`]
//! covers hosts that go through `std::process`.

use std::process::Command;

use crate::error::{CommandError, Result};

pub trait Launcher: Send + Sync {
    /// Launches `command_line` detached. The leading token is the program;
    /// no explicit working directory or environment is applied.
    fn spawn(&self, command_line: &str) -> Result<()>;
}

/// Launcher backed by `std::process::Command`. The child handle is dropped
/// immediately after a successful spawn.
#[derive(Debug, Default)]
pub struct DetachedLauncher;

impl DetachedLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl Launcher for DetachedLauncher {
    fn spawn(&self, command_line: &str) -> Result<()> {
        let argv = split_command_line(command_line);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| CommandError::InvalidArgument("empty command line".to_string()))?;

        tracing::debug!(program = %program, args = args.len(), "spawning detached process");
        let child = Command::new(program)
            .args(args)
            .spawn()
            .map_err(CommandError::Launch)?;
        // Fire and forget: the child is not tracked after creation.
        drop(child);
        Ok(())
    }
}

/// Splits a command line into program + arguments.
///
/// Double quotes group tokens containing spaces and are stripped from the
/// result; there is no escape character, matching how the templates in the
/// registry are written (`"C:\Program Files\app.exe" %1`).
pub fn split_command_line(command_line: &str) -> Vec<String> {
    let mut argv = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut seen_any = false;

    for ch in command_line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                seen_any = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if seen_any {
                    argv.push(std::mem::take(&mut current));
                    seen_any = false;
                }
            }
            c => {
                current.push(c);
                seen_any = true;
            }
        }
    }
    if seen_any {
        argv.push(current);
    }
    argv
}
