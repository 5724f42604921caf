use anyhow::Result;
use std::path::{Path, PathBuf};

/// A linked or main worktree as reported by git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeInfo {
    pub name: String,
    pub path: PathBuf,
}

/// Trait for Git operations to enable mocking in tests
pub trait GitOperations {
    /// Top-level working tree of the repository.
    fn repo_root(&self) -> PathBuf;
    fn local_branch_exists(&self, branch_name: &str) -> Result<bool>;
    /// Whether `refs/remotes/<remote>/<branch_name>` exists.
    fn remote_branch_exists(&self, remote: &str, branch_name: &str) -> Result<bool>;
    /// Checked-out branch name, `None` when HEAD is detached or unborn.
    fn current_branch(&self) -> Result<Option<String>>;
    fn list_local_branches(&self) -> Result<Vec<String>>;
    fn list_worktrees(&self) -> Result<Vec<WorktreeInfo>>;

    /// Adds a worktree at `worktree_path` with `branch_name` checked out.
    ///
    /// `new_branch_from` names the commit-ish to create the branch from; `None`
    /// attaches an existing local branch. `upstream` is set on the branch after
    /// creation.
    fn add_worktree(
        &self,
        branch_name: &str,
        worktree_path: &Path,
        new_branch_from: Option<&str>,
        upstream: Option<&str>,
    ) -> Result<()>;
}

/// Package manager invoked for the dependency step.
pub trait PackageManager {
    fn install(&self, worktree_path: &Path) -> Result<()>;
    fn run_script(&self, worktree_path: &Path, script: &str) -> Result<()>;
}
