use crate::fly::FlyError;
use std::io::{BufReader, Read};
use std::process::{Command, Stdio};
use std::thread;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

pub fn command_form(binary: &str, args: &[String]) -> String {
    format!("{} {}", binary, args.join(" "))
}

/// Runs the platform CLI to completion and captures both streams. There is
/// deliberately no timeout: a hung remote call blocks the run.
pub fn run_fly(binary: &str, args: &[String]) -> Result<CommandOutput, FlyError> {
    let command_form = command_form(binary, args);

    let mut command = Command::new(binary);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(FlyError::CliMissing {
                binary: binary.to_string(),
            })
        }
        Err(err) => {
            return Err(FlyError::Spawn {
                command: command_form,
                source: err,
            })
        }
    };

    let stdout = child.stdout.take().ok_or_else(|| FlyError::Spawn {
        command: command_form.clone(),
        source: std::io::Error::other("missing stdout pipe"),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| FlyError::Spawn {
        command: command_form.clone(),
        source: std::io::Error::other("missing stderr pipe"),
    })?;

    let stdout_reader = thread::spawn(move || {
        let mut buf = String::new();
        let mut reader = BufReader::new(stdout);
        let _ = reader.read_to_string(&mut buf);
        buf
    });
    let stderr_reader = thread::spawn(move || {
        let mut buf = String::new();
        let mut reader = BufReader::new(stderr);
        let _ = reader.read_to_string(&mut buf);
        buf
    });

    let exit_status = child.wait().map_err(|err| FlyError::Spawn {
        command: command_form.clone(),
        source: err,
    })?;

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    if !exit_status.success() {
        let mut output = stderr.trim().to_string();
        if output.is_empty() {
            output = stdout.trim().to_string();
        }
        return Err(FlyError::Command {
            command: command_form,
            exit_code: exit_status.code().unwrap_or(-1),
            output,
        });
    }

    Ok(CommandOutput { stdout, stderr })
}
