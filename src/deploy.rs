use crate::{
    config::{SiteConfig, Target},
    log,
    utils::{
        git::{CommitOutcome, WorkTree},
        message,
    },
};
use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use std::path::Path;

// Publish the site at `root` to every configured remote. The commit message
// is rendered once up front; every target pushes the same tip.
pub fn deploy_site(root: &Path, config: &'static SiteConfig, env_repo: Option<&str>) -> Result<()> {
    let Some(targets) = config.deploy.resolve_targets(env_repo)? else {
        println!("{}", missing_repo_help());
        return Ok(());
    };

    let message = message::render(config.deploy.message.as_deref(), Local::now());
    let tree = WorkTree::new(root, !config.deploy.silent);

    bootstrap(&tree, config)?;

    for target in &targets {
        push_target(&tree, target, &message, config)?;
    }

    Ok(())
}

fn bootstrap(tree: &WorkTree, config: &SiteConfig) -> Result<()> {
    if !tree.is_initialized() {
        log!("deploy"; "setting up git deployment in `{}`", tree.root().display());
        tree.init()?;
        tree.set_identity(config.deploy.name.as_deref(), config.deploy.email.as_deref())?;
    }

    log!("deploy"; "fetching origin");
    if let Err(err) = tree.fetch_origin() {
        // best-effort reconciliation, a fresh init has no origin yet
        log!("deploy"; "fetch from origin failed ({err}), continuing with local history");
    }

    Ok(())
}

fn push_target(tree: &WorkTree, target: &Target, message: &str, config: &SiteConfig) -> Result<()> {
    tree.set_identity(config.deploy.name.as_deref(), config.deploy.email.as_deref())?;
    tree.stage_all()?;

    match tree.commit(message)? {
        CommitOutcome::Created => log!("deploy"; "committed `{message}`"),
        CommitOutcome::NothingToCommit => log!("deploy"; "nothing to commit, pushing existing history"),
    }

    log!("deploy"; "pushing to `{}` ({})", target.url, target.branch);
    tree.push(&target.url, &target.branch)?;

    Ok(())
}

fn missing_repo_help() -> String {
    let mut help = String::new();

    help += "You have to configure the deployment settings in sitegit.toml first!\n\n";
    help += "Example:\n";
    help += "  [deploy]\n";
    help += "  repo = \"<repository url>\"\n";
    help += "  branch = \"<branch>\"\n";
    help += "  message = \"<message>\"\n\n";
    help += &format!(
        "For more help, you can check the docs: {}",
        "https://github.com/kawayww/sitegit#configuration".underline()
    );

    help
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoSetting;
    use std::{fs, process::Command};
    use tempfile::TempDir;

    fn git_raw(dir: &Path, args: &[&str]) -> std::process::Output {
        Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("LC_ALL", "C")
            .output()
            .expect("git is available")
    }

    fn git(dir: &Path, args: &[&str]) -> String {
        let output = git_raw(dir, args);
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_owned()
    }

    fn bare_remote() -> TempDir {
        let remote = TempDir::new().unwrap();
        git(remote.path(), &["init", "--bare"]);
        remote
    }

    fn site_with_file() -> TempDir {
        let site = TempDir::new().unwrap();
        fs::write(site.path().join("foo.txt"), "foo").unwrap();
        site
    }

    fn deploy_config(repo: Option<RepoSetting>) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.deploy.repo = repo;
        config.deploy.name = Some("deployer".to_owned());
        config.deploy.email = Some("deployer@example.com".to_owned());
        config.deploy.silent = true;
        config
    }

    fn leak(config: SiteConfig) -> &'static SiteConfig {
        Box::leak(Box::new(config))
    }

    fn url(dir: &TempDir) -> String {
        dir.path().to_str().unwrap().to_owned()
    }

    #[test]
    fn without_repo_prints_help_and_touches_nothing() {
        let site = TempDir::new().unwrap();
        let config = leak(deploy_config(None));

        deploy_site(site.path(), config, None).unwrap();
        deploy_site(site.path(), config, Some("")).unwrap();

        assert!(!site.path().join(".git").exists());
    }

    #[test]
    fn single_target_round_trip() {
        let site = site_with_file();
        let remote = bare_remote();
        let config = leak(deploy_config(Some(RepoSetting::Url(url(&remote)))));

        deploy_site(site.path(), config, None).unwrap();

        let clone = TempDir::new().unwrap();
        git(clone.path(), &["clone", "--branch", "master", &url(&remote), "."]);

        assert_eq!(fs::read_to_string(clone.path().join("foo.txt")).unwrap(), "foo");

        let head = fs::read_to_string(clone.path().join(".git").join("HEAD")).unwrap();
        assert_eq!(head.trim(), "ref: refs/heads/master");
    }

    #[test]
    fn env_repo_fallback_deploys() {
        let site = site_with_file();
        let remote = bare_remote();
        let config = leak(deploy_config(None));

        let remote_url = url(&remote);
        deploy_site(site.path(), config, Some(remote_url.as_str())).unwrap();

        assert!(!git(remote.path(), &["rev-parse", "master"]).is_empty());
    }

    #[test]
    fn custom_message_is_used_verbatim() {
        let site = site_with_file();
        let remote = bare_remote();
        let mut config = deploy_config(Some(RepoSetting::Url(url(&remote))));
        config.deploy.message = Some("custom message".to_owned());

        deploy_site(site.path(), leak(config), None).unwrap();

        let subject = git(remote.path(), &["log", "-1", "--pretty=format:%s", "master"]);
        assert_eq!(subject, "custom message");
    }

    #[test]
    fn rerun_without_changes_succeeds_with_one_commit() {
        let site = site_with_file();
        let remote = bare_remote();
        let config = leak(deploy_config(Some(RepoSetting::Url(url(&remote)))));

        deploy_site(site.path(), config, None).unwrap();
        deploy_site(site.path(), config, None).unwrap();

        assert_eq!(git(remote.path(), &["rev-list", "--count", "master"]), "1");
    }

    #[test]
    fn second_deploy_pushes_new_content() {
        let site = site_with_file();
        let remote = bare_remote();
        let config = leak(deploy_config(Some(RepoSetting::Url(url(&remote)))));

        deploy_site(site.path(), config, None).unwrap();

        fs::write(site.path().join("foo.txt"), "bar").unwrap();
        deploy_site(site.path(), config, None).unwrap();

        let clone = TempDir::new().unwrap();
        git(clone.path(), &["clone", "--branch", "master", &url(&remote), "."]);

        assert_eq!(fs::read_to_string(clone.path().join("foo.txt")).unwrap(), "bar");
        assert_eq!(git(remote.path(), &["rev-list", "--count", "master"]), "2");
    }

    #[test]
    fn multiple_targets_mirror_one_commit() {
        let site = site_with_file();
        let first = bare_remote();
        let second = bare_remote();

        let mut detailed = toml::Table::new();
        detailed.insert("url".to_owned(), toml::Value::String(url(&second)));
        detailed.insert("branch".to_owned(), toml::Value::String("mirror".to_owned()));

        let mut remotes = toml::Table::new();
        remotes.insert("first".to_owned(), toml::Value::String(url(&first)));
        remotes.insert("second".to_owned(), toml::Value::Table(detailed));

        let config = leak(deploy_config(Some(RepoSetting::Remotes(remotes))));
        deploy_site(site.path(), config, None).unwrap();

        let tip_first = git(first.path(), &["rev-parse", "master"]);
        let tip_second = git(second.path(), &["rev-parse", "mirror"]);
        assert_eq!(tip_first, tip_second);
    }

    #[test]
    fn push_failure_aborts_remaining_targets() {
        let site = site_with_file();
        let reachable = bare_remote();

        let mut remotes = toml::Table::new();
        remotes.insert(
            "broken".to_owned(),
            toml::Value::String("/definitely/not/a/repo".to_owned()),
        );
        remotes.insert("reachable".to_owned(), toml::Value::String(url(&reachable)));

        let config = leak(deploy_config(Some(RepoSetting::Remotes(remotes))));
        assert!(deploy_site(site.path(), config, None).is_err());

        let untouched = git_raw(reachable.path(), &["rev-parse", "--verify", "master"]);
        assert!(!untouched.status.success());
    }

    #[test]
    fn help_names_the_expected_config_shape() {
        let help = missing_repo_help();

        assert!(help.contains("sitegit.toml"));
        assert!(help.contains("[deploy]"));
        assert!(help.contains("repo = "));
        assert!(help.contains("docs"));
    }
}
