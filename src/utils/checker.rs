use anyhow::{Context, Result};

pub fn check_required_command_installed() -> Result<()> {
    check_git_installed()
}

fn check_git_installed() -> Result<()> {
    which::which("git")
        .map(drop)
        .with_context(|| not_found_message("git"))
}

fn not_found_message(command: &str) -> String {
    format!("[checker] `{command}` not found. Please install `{command}` first.")
}
