//! Shell command execution for `run:` and `spawn:`.
//!
//! Commands go through `sh -c` (`cmd /C` on Windows) and inherit the
//! interpreter's stdin, stdout and stderr.

use sat_types::ast::ProcessHandle;
use std::io;
use std::process::{Command, ExitStatus};

fn shell(command: &str) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C");
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c");
        cmd
    };
    cmd.arg(command);
    cmd
}

/// Run `command` to completion.
pub fn run(command: &str) -> io::Result<ExitStatus> {
    log::debug!(target: "sat", "run: {command}");
    let status = shell(command).status()?;
    log::debug!(target: "sat", "run: {command} exited with {status}");
    Ok(status)
}

/// Start `command` in the background.
pub fn spawn(command: &str) -> io::Result<ProcessHandle> {
    let child = shell(command).spawn()?;
    log::debug!(target: "sat", "spawn: {command} started as pid {}", child.id());
    Ok(ProcessHandle::new(command, child))
}

/// Terminate a spawned process and wait for it to exit.
pub fn kill(process: &ProcessHandle) -> io::Result<()> {
    log::debug!(target: "sat", "kill: {process}");
    process.kill()
}
