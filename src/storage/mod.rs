use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

use crate::error::SetupError;
use crate::git;

/// Location of the worktree about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeTarget {
    /// Absolute base directory holding all worktrees.
    pub base_dir: PathBuf,
    /// `base_dir` joined with the branch name verbatim.
    pub path: PathBuf,
}

/// Joins the base directory with the branch name.
///
/// Branch names are not sanitized, so `bugfix/issue-123` nests as
/// `<base>/bugfix/issue-123`.
#[must_use]
pub fn worktree_path(base_dir: &Path, branch_name: &str) -> PathBuf {
    base_dir.join(branch_name)
}

/// Target path as it will be reported once created, without touching disk.
///
/// The base is canonicalized when it already exists and otherwise has its
/// `.` and `..` components folded away.
#[must_use]
pub fn preview_path(base_dir: &Path, branch_name: &str) -> PathBuf {
    let base = base_dir
        .canonicalize()
        .unwrap_or_else(|_| normalize_lexically(base_dir));
    worktree_path(&base, branch_name)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` above the root is the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

impl WorktreeTarget {
    /// Creates the base directory, makes it absolute and checks the target is free
    ///
    /// # Errors
    /// Returns an error if:
    /// - The branch name is not a valid git branch name
    /// - Failed to create or canonicalize the base directory
    /// - The target path already exists
    pub fn prepare(base_dir: &Path, branch_name: &str) -> Result<Self> {
        if !git::is_valid_branch_name(branch_name) {
            anyhow::bail!(SetupError::precondition(format!(
                "'{}' is not a valid branch name",
                branch_name
            )));
        }

        std::fs::create_dir_all(base_dir).with_context(|| {
            format!("Failed to create worktree base directory: {}", base_dir.display())
        })?;
        let base_dir = base_dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", base_dir.display()))?;

        let path = worktree_path(&base_dir, branch_name);
        if path.exists() {
            anyhow::bail!(SetupError::precondition(format!(
                "Worktree path already exists: {}\n  \
                 If it is a stale worktree, remove it with:\n    \
                 git worktree remove {}\n  \
                 or delete the directory and run `git worktree prune`",
                path.display(),
                path.display()
            )));
        }

        log::debug!("worktree target {}", path.display());
        Ok(Self { base_dir, path })
    }
}
