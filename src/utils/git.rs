use crate::utils::command::{into_arg, run_command, try_run_command};
use anyhow::{Result, bail};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Output,
};

/// Outcome of the commit step. Staging identical content twice is routine
/// when several remotes share one working copy, so "nothing to commit" is a
/// first-class result instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Created,
    NothingToCommit,
}

/// The local working copy being deployed. Every operation shells out to
/// `git` with the site root as the working directory.
#[derive(Debug)]
pub struct WorkTree {
    root: PathBuf,
    verbose: bool,
}

impl WorkTree {
    pub fn new(root: &Path, verbose: bool) -> Self {
        Self {
            root: root.to_owned(),
            verbose,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // `.git` presence is the bootstrap marker, there is no re-init once it exists
    pub fn is_initialized(&self) -> bool {
        self.root.join(".git").exists()
    }

    pub fn init(&self) -> Result<()> {
        self.git(["init"]).map(drop)
    }

    /// Safe to repeat; skips whichever fields are absent.
    pub fn set_identity(&self, name: Option<&str>, email: Option<&str>) -> Result<()> {
        if let Some(name) = name {
            self.git(["config", "user.name", name])?;
        }
        if let Some(email) = email {
            self.git(["config", "user.email", email])?;
        }

        Ok(())
    }

    pub fn fetch_origin(&self) -> Result<()> {
        self.git(["fetch", "origin"]).map(drop)
    }

    pub fn stage_all(&self) -> Result<()> {
        self.git(["add", "-A"]).map(drop)
    }

    pub fn commit(&self, message: &str) -> Result<CommitOutcome> {
        let output = self.git_unchecked(["commit", "-m", message])?;

        if output.status.success() {
            return Ok(CommitOutcome::Created);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let nothing_staged = [stdout.as_ref(), stderr.as_ref()]
            .iter()
            .any(|s| s.contains("nothing to commit") || s.contains("nothing added to commit"));
        if nothing_staged {
            return Ok(CommitOutcome::NothingToCommit);
        }

        bail!("`git commit` failed: {}", stderr.trim());
    }

    /// Create-or-update the remote `branch` with the local tip.
    pub fn push(&self, url: &str, branch: &str) -> Result<()> {
        let refspec = format!("HEAD:{branch}");
        self.git(["push", "-u", url, refspec.as_str()]).map(drop)
    }

    fn git<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        run_command(Some(&self.root), self.verbose, &[into_arg("git")], &Self::args(args))
    }

    fn git_unchecked<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        try_run_command(Some(&self.root), self.verbose, &[into_arg("git")], &Self::args(args))
    }

    fn args<I, S>(args: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        args.into_iter().map(into_arg).filter(|arg| !arg.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn work_tree() -> (TempDir, WorkTree) {
        let dir = TempDir::new().unwrap();
        let tree = WorkTree::new(dir.path(), false);
        (dir, tree)
    }

    #[test]
    fn init_is_detected() {
        let (_dir, tree) = work_tree();

        assert!(!tree.is_initialized());
        tree.init().unwrap();
        assert!(tree.is_initialized());
    }

    #[test]
    fn commit_distinguishes_noop_from_real_commit() {
        let (dir, tree) = work_tree();
        tree.init().unwrap();
        tree.set_identity(Some("deployer"), Some("deployer@example.com")).unwrap();

        fs::write(dir.path().join("a.txt"), "a").unwrap();
        tree.stage_all().unwrap();
        assert_eq!(tree.commit("first").unwrap(), CommitOutcome::Created);

        tree.stage_all().unwrap();
        assert_eq!(tree.commit("again").unwrap(), CommitOutcome::NothingToCommit);
    }

    #[test]
    fn identity_fields_are_optional() {
        let (_dir, tree) = work_tree();
        tree.init().unwrap();

        tree.set_identity(None, None).unwrap();
    }
}
