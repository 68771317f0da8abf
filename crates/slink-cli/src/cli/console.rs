//! Terminal-backed user input for plugins.

use std::io::{self, BufRead, IsTerminal, Write};

use slink_core::plugin::PluginError;
use slink_core::UserInputRequester;

/// Prompts on stderr and reads from stdin.
#[derive(Debug, Default)]
pub struct ConsoleInput;

fn io_err(e: io::Error) -> PluginError {
    PluginError::failed("console", e.to_string())
}

fn write_prompt(prompt: &str) -> Result<(), PluginError> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{prompt}: ").map_err(io_err)?;
    stderr.flush().map_err(io_err)
}

/// Read a secret with echo disabled; refuses when stdin is not a terminal.
fn read_secret(
    prompt: &str,
    interactive: bool,
    read: impl FnOnce() -> io::Result<String>,
) -> Result<String, PluginError> {
    if !interactive {
        return Err(PluginError::failed(
            "console",
            "password input requires an interactive terminal",
        ));
    }
    write_prompt(prompt)?;
    read().map_err(|e| PluginError::failed("console", format!("failed to read password: {e}")))
}

impl UserInputRequester for ConsoleInput {
    fn ask(&self, prompt: &str) -> Result<String, PluginError> {
        write_prompt(prompt)?;
        let mut line = String::new();
        let n = io::stdin().lock().read_line(&mut line).map_err(io_err)?;
        if n == 0 {
            return Err(PluginError::failed("console", "no input (stdin closed)"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_password(&self, prompt: &str) -> Result<String, PluginError> {
        read_secret(prompt, io::stdin().is_terminal(), rpassword::read_password)
    }
}
