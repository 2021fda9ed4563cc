//! External command runner
//!
//! Runs the messaging client synchronously with stderr merged into stdout.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::NotifyError;

/// Exit code and merged output of one finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub output: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Something that can run an external program to completion
pub trait CommandRunner {
    /// Run `program` with `args`. A non-zero exit is not an error; failing to
    /// start the process is.
    fn run(&self, program: &Path, args: &[String]) -> Result<CommandResult, NotifyError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &Path, args: &[String]) -> Result<CommandResult, NotifyError> {
        (**self).run(program, args)
    }
}

/// Runs commands as real child processes, never through a shell
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<CommandResult, NotifyError> {
        let command_line = render_command(program, args);
        log::debug!("Running command: {}", command_line);

        let launch_error = |source: io::Error| NotifyError::ProcessLaunch {
            command: command_line.clone(),
            source,
        };

        // Both streams share one pipe so the client's output keeps its ordering
        let (mut reader, writer) = io::pipe().map_err(launch_error)?;
        let stderr_writer = writer.try_clone().map_err(launch_error)?;

        // The Command holds the write ends; it must drop before we read to EOF
        let mut child = {
            let mut command = Command::new(program);
            command
                .args(args)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(stderr_writer);
            command.spawn().map_err(launch_error)?
        };

        let mut raw = Vec::new();
        let read_result = reader.read_to_end(&mut raw);
        let status = child.wait().map_err(launch_error)?;
        read_result.map_err(launch_error)?;

        let result = CommandResult {
            exit_code: status.code().unwrap_or(-1),
            output: String::from_utf8_lossy(&raw).trim_end().to_string(),
        };
        log::debug!("Command exited with code {}", result.exit_code);

        Ok(result)
    }
}

/// Render a program and its arguments as a copy-pasteable shell line.
/// Only used for diagnostics; nothing is ever executed through a shell.
pub fn render_command(program: &Path, args: &[String]) -> String {
    let mut parts = vec![quote(&program.to_string_lossy())];
    parts.extend(args.iter().map(|a| quote(a)));
    parts.join(" ")
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "+-_./:=@,%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
