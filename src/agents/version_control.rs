use crate::error::{Result, TagsyncError};
use crate::runner::CommandRunner;

/// VersionControlAgent handles the few git operations the update run needs
pub struct VersionControlAgent<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> VersionControlAgent<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Discard working-tree changes to a tracked file
    pub fn restore_file(&self, path: &str) -> Result<()> {
        self.run_git(&["checkout", path])
    }

    /// Stage the given paths (globs are expanded by git)
    pub fn stage(&self, paths: &[&str]) -> Result<()> {
        let mut args = vec!["add"];
        args.extend_from_slice(paths);
        self.run_git(&args)
    }

    /// Commit with a signed-off message
    pub fn commit(&self, message: &str) -> Result<()> {
        self.run_git(&["commit", "-s", "-m", message])
    }

    /// Stage and commit in one step
    pub fn commit_files(&self, paths: &[&str], message: &str) -> Result<()> {
        self.stage(paths)?;
        self.commit(message)
    }

    fn run_git(&self, args: &[&str]) -> Result<()> {
        self.runner
            .run("git", args)
            .map(|_| ())
            .map_err(|err| TagsyncError::GitOperation(err.to_string()))
    }
}
