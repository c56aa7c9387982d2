use crate::log;
use anyhow::Result;
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Output},
};

pub fn into_arg<S>(arg: S) -> OsString
where
    S: Into<OsString>,
{
    arg.into()
}

/// Run a command to completion, relay its output when `verbose`, and turn a
/// non-zero exit into an error carrying the captured stderr.
pub fn run_command(root: Option<&Path>, verbose: bool, command: &[OsString], args: &[OsString]) -> Result<Output> {
    let (name, output) = capture_command(root, command, args)?;
    log_for_command(&name, &output, verbose)?;

    Ok(output)
}

/// Like [`run_command`], but a non-zero exit is handed back to the caller
/// instead of becoming an error.
pub fn try_run_command(root: Option<&Path>, verbose: bool, command: &[OsString], args: &[OsString]) -> Result<Output> {
    let (name, output) = capture_command(root, command, args)?;
    if verbose {
        emit_output(&name, &output);
    }

    Ok(output)
}

fn capture_command(root: Option<&Path>, command: &[OsString], args: &[OsString]) -> Result<(String, Output)> {
    let args: Vec<OsString> = [&command[1..], args].concat();
    let command_name = command[0].to_string_lossy().into_owned();

    let mut command = Command::new(&command[0]);
    command.args(&args);
    // keep tool output in english, the commit verb matches on it
    command.env("LC_ALL", "C");
    if let Some(root) = root {
        command.current_dir(root);
    }

    let output = command.output()?;
    Ok((command_name, output))
}

#[rustfmt::skip]
pub fn log_for_command(name: &str, output: &Output, verbose: bool) -> Result<()> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("`{name}` failed: {}", stderr.trim());
    }

    if verbose {
        emit_output(name, output);
    }

    Ok(())
}

fn emit_output(name: &str, output: &Output) {
    let (stdout, stderr) = (String::from_utf8_lossy(&output.stdout), String::from_utf8_lossy(&output.stderr));

    stdout.lines().filter(|line| !line.trim().is_empty()).for_each(|line| log!(name; "{line}"));
    stderr.lines().filter(|line| !line.trim().is_empty()).for_each(|line| log!(name; "{line}"));
}
