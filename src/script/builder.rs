// file: src/script/builder.rs
// version: 1.0.0
// guid: a8f3d652-19c7-4be0-97d4-3c60e18b52f9

//! Ordered shell script assembly with masked progress echoes

use crate::Result;
use std::process::Command;
use tracing::debug;

use super::mask::mask_credentials;

/// Prefix stamped on every progress echo emitted by the launcher
pub const ECHO_PREFIX: &str = "[AML Submit Agent] Job Launcher:";

/// Statement separator used when joining the accumulated fragments
const SEPARATOR: &str = " ; ";

/// Executes a joined shell script
///
/// Injected into [`ScriptBuilder::run`] so tests can capture the script
/// without spawning a shell.
pub trait ShellRunner {
    /// Execute `script` synchronously, returning the shell's exit code
    fn run(&mut self, script: &str) -> Result<i32>;
}

/// Production runner backed by `bash -c`
pub struct SystemShell;

impl ShellRunner for SystemShell {
    fn run(&mut self, script: &str) -> Result<i32> {
        debug!("Executing joined script ({} bytes)", script.len());

        let status = Command::new("bash")
            .arg("-c")
            .arg(script)
            .status()
            .map_err(|e| crate::error::SubmitAgentError::ProcessError {
                command: script.to_string(),
                exit_code: None,
                stderr: format!("Failed to execute command: {}", e),
            })?;

        Ok(status.code().unwrap_or(-1))
    }
}

/// Accumulates shell command fragments in execution order
///
/// Fragments are append-only: nothing is reordered or removed once added.
/// Every substantive command added through [`ScriptBuilder::add`] is
/// immediately preceded by a credential-masked echo of itself.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    fragments: Vec<String>,
}

impl ScriptBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            fragments: Vec::new(),
        }
    }

    fn append(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    /// Append a progress echo of `message`, masked and escaped for display.
    /// Echoes carry no executable semantics.
    pub fn print(&mut self, message: &str) {
        let masked = mask_credentials(message);
        let escaped = escape_for_echo(&masked);
        self.append(format!("echo \"{} {}\"", ECHO_PREFIX, escaped));
    }

    /// Append `command` preceded by its masked echo. The executed copy keeps
    /// the command verbatim, credentials included.
    pub fn add(&mut self, command: &str) {
        let command = command.replace("\\;", ";");
        self.print(&command);
        self.append(command);
    }

    /// Join the accumulated fragments with `" ; "` in append order.
    ///
    /// The `;` separator means a failing statement does not abort the
    /// remainder; the joined script's exit status is that of its last
    /// statement.
    pub fn script(&self) -> String {
        self.fragments.join(SEPARATOR)
    }

    /// Number of accumulated fragments
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether no fragments have been accumulated
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Hand the joined script to `runner` and return the shell's exit code
    pub fn run(&self, runner: &mut dyn ShellRunner) -> Result<i32> {
        runner.run(&self.script())
    }
}

/// Escape characters that would break out of a double-quoted echo statement
fn escape_for_echo(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
}
