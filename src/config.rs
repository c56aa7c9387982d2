use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::{Path, PathBuf}};
use thiserror::Error;
use crate::cli::Cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(
        PathBuf,
        #[source] std::io::Error,
    ),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("config file validation error: {0}")]
    Validation(String),
}

// for default value in serde
pub mod serde_defaults {
    pub mod deploy {
        pub fn branch() -> String { "master".into() }
    }
}

// one remote-url/branch pair the deploy sequence pushes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: String,
    pub branch: String,
}

// `deploy.repo`: a single url, or a table of named remotes where each entry
// is a url string or an inline `{ url, branch }` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepoSetting {
    Url(String),
    Remotes(toml::Table),
}

// `[deploy]` in toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct DeployConfig {
    // remote url(s) to push to
    #[serde(alias = "repository")]
    pub repo: Option<RepoSetting>,

    // applied to every target that doesn't name its own branch
    #[serde(default = "serde_defaults::deploy::branch")]
    #[educe(Default(expression = serde_defaults::deploy::branch()))]
    pub branch: String,

    // commit message template, `{{ now("<strftime>") }}` is substituted
    #[serde(alias = "msg", alias = "m")]
    pub message: Option<String>,

    // committer identity, written into the working copy when present
    #[serde(alias = "user", alias = "userName")]
    pub name: Option<String>,

    #[serde(alias = "userEmail")]
    pub email: Option<String>,

    // don't relay git's own output
    pub silent: bool,
}

// top-level toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub deploy: DeployConfig,

    // options for other tools in the pipeline ride along untouched
    pub extra: HashMap<String, toml::Value>,
}

impl DeployConfig {
    // The env fallback is an explicit argument so resolution is a pure
    // function of its inputs; the caller decides what ambient state feeds it.
    // `Ok(None)` means no remote is configured at all.
    pub fn resolve_targets(&self, fallback_repo: Option<&str>) -> Result<Option<Vec<Target>>, ConfigError> {
        let fallback = fallback_repo.map(str::trim).filter(|url| !url.is_empty());

        let repo = match &self.repo {
            Some(RepoSetting::Url(url)) if url.trim().is_empty() => None,
            Some(repo) => Some(repo.clone()),
            None => None,
        };
        let Some(repo) = repo.or_else(|| fallback.map(|url| RepoSetting::Url(url.to_owned()))) else {
            return Ok(None);
        };

        let targets = match repo {
            RepoSetting::Url(url) => vec![Target { url, branch: self.branch.clone() }],
            RepoSetting::Remotes(remotes) => remotes
                .iter()
                .map(|(name, setting)| self.target_from_entry(name, setting))
                .collect::<Result<_, _>>()?,
        };

        if targets.is_empty() {
            return Ok(None);
        }

        Ok(Some(targets))
    }

    fn target_from_entry(&self, name: &str, setting: &toml::Value) -> Result<Target, ConfigError> {
        match setting {
            toml::Value::String(url) => Ok(Target {
                url: url.clone(),
                branch: self.branch.clone(),
            }),
            toml::Value::Table(table) => {
                let url = table.get("url").and_then(toml::Value::as_str).ok_or_else(|| {
                    ConfigError::Validation(format!("remote `{name}` is missing a `url`"))
                })?;
                let branch = table.get("branch").and_then(toml::Value::as_str).unwrap_or(&self.branch);

                Ok(Target {
                    url: url.to_owned(),
                    branch: branch.to_owned(),
                })
            }
            _ => Err(ConfigError::Validation(format!(
                "remote `{name}` should be a url string or a `{{ url, branch }}` table"
            ))),
        }
    }
}

impl SiteConfig {
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Io (
            path.to_path_buf(),
            err
        ))?;
        Self::from_str(&content)
    }

    #[rustfmt::skip]
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let deploy = &mut self.deploy;

        if let Some(repo) = &cli.repo { deploy.repo = Some(RepoSetting::Url(repo.to_owned())); }
        if let Some(branch) = &cli.branch { deploy.branch = branch.to_owned(); }
        if let Some(message) = &cli.message { deploy.message = Some(message.to_owned()); }
        if let Some(name) = &cli.name { deploy.name = Some(name.to_owned()); }
        if let Some(email) = &cli.email { deploy.email = Some(email.to_owned()); }
        if let Some(silent) = cli.silent { deploy.silent = silent; }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.deploy.branch.trim().is_empty() {
            return Err(ConfigError::Validation(
                "`deploy.branch` cannot be empty".into()
            ));
        }

        Ok(())
    }
}
