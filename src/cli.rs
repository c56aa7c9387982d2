use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Site directory to deploy
    #[arg(short, long, default_value = "./")]
    pub root: PathBuf,

    /// Config file path related to `root`
    #[arg(short = 'C', long, default_value = "sitegit.toml")]
    pub config: PathBuf,

    /// Remote repository url, overrides `deploy.repo` in the config file
    #[arg(long)]
    pub repo: Option<String>,

    /// Branch applied to every target that doesn't name its own
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Commit message template, `{{ now("<strftime>") }}` is substituted
    #[arg(short, long)]
    pub message: Option<String>,

    /// Committer name
    #[arg(long)]
    pub name: Option<String>,

    /// Committer email
    #[arg(long)]
    pub email: Option<String>,

    /// Don't relay git's own output
    #[arg(short, long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub silent: Option<bool>,
}
