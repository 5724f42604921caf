use anyhow::{Context, Result};
use git2::{BranchType, ErrorCode, Repository};
use std::path::{Path, PathBuf};

use crate::error::SetupError;
use crate::traits::{GitOperations, WorktreeInfo};

pub mod strategy;

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discovers the repository containing `path`
    ///
    /// # Errors
    /// Returns a precondition error if:
    /// - No repository is found at or above `path`
    /// - The repository is bare and has no working tree
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            log::debug!("repository discovery from {} failed: {}", path.display(), e);
            SetupError::precondition("Not inside a git repository")
        })?;
        if repo.workdir().is_none() {
            anyhow::bail!(SetupError::precondition(
                "Repository has no working tree (bare repository)"
            ));
        }
        log::debug!("opened repository at {}", repo.path().display());
        Ok(Self { repo })
    }

    fn find_optional_reference(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(name) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to look up {}", name)),
        }
    }

    fn main_worktree_path(&self) -> PathBuf {
        // commondir is `<main>/.git/` for both the main and linked worktrees
        self.repo
            .commondir()
            .parent()
            .map_or_else(|| self.repo_root(), Path::to_path_buf)
    }

    /// Resolves a branch, tag or commit to the commit it points at
    fn resolve_commit(&self, reference: &str) -> Result<git2::Commit<'_>> {
        let obj = self
            .repo
            .revparse_single(reference)
            .with_context(|| format!("Failed to resolve reference '{}'", reference))?;
        obj.peel_to_commit()
            .with_context(|| format!("Reference '{}' does not point to a commit", reference))
    }

    /// First admin name derived from `branch_name` that no worktree uses yet
    fn free_admin_name(&self, branch_name: &str) -> String {
        let admin_dir = self.repo.commondir().join("worktrees");
        pick_admin_name(&worktree_admin_name(branch_name), |name| {
            admin_dir.join(name).exists() || self.repo.find_worktree(name).is_ok()
        })
    }
}

/// Returns `base` if it is free, else `base` followed by the lowest free
/// number, the way `git worktree add` disambiguates.
fn pick_admin_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}{}", base, n))
        .find(|name| !taken(name))
        .unwrap_or_else(|| base.to_string())
}

/// Checks a branch name against git's reference naming rules.
#[must_use]
pub fn is_valid_branch_name(branch_name: &str) -> bool {
    git2::Reference::is_valid_name(&format!("refs/heads/{}", branch_name))
}

/// Name of the administrative entry under `.git/worktrees/`.
///
/// Nested branch names share a basename often enough (`feature/api`,
/// `bugfix/api`) that the full name is flattened instead.
fn worktree_admin_name(branch_name: &str) -> String {
    branch_name.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "-")
}

impl GitOperations for GitRepo {
    fn repo_root(&self) -> PathBuf {
        self.repo
            .workdir()
            .unwrap_or_else(|| self.repo.path())
            .to_path_buf()
    }

    fn local_branch_exists(&self, branch_name: &str) -> Result<bool> {
        match self.repo.find_branch(branch_name, BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) if e.code() == ErrorCode::InvalidSpec => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn remote_branch_exists(&self, remote: &str, branch_name: &str) -> Result<bool> {
        self.find_optional_reference(&format!("refs/remotes/{}/{}", remote, branch_name))
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None);
            }
            Err(e) => return Err(e).context("Failed to read HEAD"),
        };
        if head.is_branch() {
            Ok(head.shorthand().map(str::to_string))
        } else {
            Ok(None)
        }
    }

    fn list_local_branches(&self) -> Result<Vec<String>> {
        let branches = self.repo.branches(Some(BranchType::Local))?;
        let mut branch_names = Vec::new();

        for branch_result in branches {
            let (branch, _) = branch_result?;
            if let Some(name) = branch.name()? {
                branch_names.push(name.to_string());
            }
        }

        branch_names.sort();
        Ok(branch_names)
    }

    fn list_worktrees(&self) -> Result<Vec<WorktreeInfo>> {
        let main_path = self.main_worktree_path();
        let main_name = main_path
            .file_name()
            .map_or_else(|| "main".to_string(), |n| n.to_string_lossy().to_string());
        let mut worktrees = vec![WorktreeInfo {
            name: main_name,
            path: main_path,
        }];

        let names = self.repo.worktrees().context("Failed to list worktrees")?;
        for name in names.iter().flatten() {
            match self.repo.find_worktree(name) {
                Ok(worktree) => worktrees.push(WorktreeInfo {
                    name: name.to_string(),
                    path: worktree.path().to_path_buf(),
                }),
                Err(e) => log::debug!("skipping worktree {}: {}", name, e),
            }
        }

        Ok(worktrees)
    }

    fn add_worktree(
        &self,
        branch_name: &str,
        worktree_path: &Path,
        new_branch_from: Option<&str>,
        upstream: Option<&str>,
    ) -> Result<()> {
        // Chosen before the branch exists so a clash cannot leave one behind
        let admin_name = self.free_admin_name(branch_name);

        let mut branch = match new_branch_from {
            Some(start_point) => {
                let commit = self.resolve_commit(start_point)?;
                log::debug!("creating branch {} at {}", branch_name, commit.id());
                self.repo
                    .branch(branch_name, &commit, false)
                    .with_context(|| format!("Failed to create branch '{}'", branch_name))?
            }
            None => self
                .repo
                .find_branch(branch_name, BranchType::Local)
                .with_context(|| format!("Failed to find branch '{}'", branch_name))?,
        };

        let created = new_branch_from.is_some();
        let result = self.attach_worktree(&mut branch, &admin_name, worktree_path, upstream);
        if result.is_err() && created {
            log::debug!("removing branch {} after failed worktree add", branch_name);
            if let Err(e) = branch.delete() {
                log::warn!("could not remove branch '{}': {}", branch_name, e);
            }
        }
        result
    }
}

impl GitRepo {
    fn attach_worktree(
        &self,
        branch: &mut git2::Branch<'_>,
        admin_name: &str,
        worktree_path: &Path,
        upstream: Option<&str>,
    ) -> Result<()> {
        if let Some(upstream) = upstream {
            branch.set_upstream(Some(upstream)).with_context(|| {
                format!("Failed to set upstream to '{}'", upstream)
            })?;
        }

        // libgit2 creates only the leaf directory
        if let Some(parent) = worktree_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create parent directory: {}", parent.display())
            })?;
        }

        let mut opts = git2::WorktreeAddOptions::new();
        opts.reference(Some(branch.get()));

        log::debug!(
            "adding worktree {} at {}",
            admin_name,
            worktree_path.display()
        );
        self.repo
            .worktree(admin_name, worktree_path, Some(&opts))
            .with_context(|| format!("Failed to create worktree at {}", worktree_path.display()))?;

        Ok(())
    }
}
