mod cli;
mod config;
mod deploy;
mod utils;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use deploy::deploy_site;
use std::env;
use utils::checker::check_required_command_installed;

// fallback for `deploy.repo`, read once here so resolution stays pure
const REPO_ENV: &str = "SITEGIT_REPO";

#[rustfmt::skip]
fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    let config: &'static SiteConfig = {
        let config_file = cli.root.join(&cli.config);
        let mut config =
            if config_file.exists() { SiteConfig::from_file(&config_file)? }
            else { SiteConfig::default() };
        config.update_with_cli(cli);

        Box::leak(Box::new(config))
    };

    check_required_command_installed()?;

    let env_repo = env::var(REPO_ENV).ok();
    deploy_site(&cli.root, config, env_repo.as_deref())
}
