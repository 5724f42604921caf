//! Branch resolution for a new worktree.
//!
//! Exactly one [`BranchStrategy`] applies to a run. [`BranchStrategy::resolve`]
//! checks the candidates in priority order:
//!
//! 1. the branch exists locally
//! 2. the branch exists as a remote-tracking ref
//! 3. a source branch was given
//! 4. fall back to the current HEAD commit

use anyhow::Result;
use std::path::Path;

use crate::error::SetupError;
use crate::traits::GitOperations;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchStrategy {
    /// Check out the existing local branch.
    AttachLocal,
    /// Create a local branch from `<remote>/<branch>` and track it.
    TrackRemote { upstream: String },
    /// Create a new branch from `source`, resolved to the fully qualified
    /// `start_point` so a same-named tag cannot shadow it.
    FromSource { source: String, start_point: String },
    /// Create a new branch from HEAD.
    FromHead,
}

impl BranchStrategy {
    /// Picks the strategy for `branch`.
    ///
    /// # Errors
    /// Returns a precondition error when `source` exists neither locally nor on
    /// `remote`, and propagates git lookup failures.
    pub fn resolve(
        git: &dyn GitOperations,
        branch: &str,
        source: Option<&str>,
        remote: &str,
    ) -> Result<Self> {
        if git.local_branch_exists(branch)? {
            return Ok(Self::AttachLocal);
        }

        if git.remote_branch_exists(remote, branch)? {
            return Ok(Self::TrackRemote {
                upstream: format!("{}/{}", remote, branch),
            });
        }

        if let Some(source) = source {
            let start_point = resolve_source(git, source, remote)?;
            return Ok(Self::FromSource {
                source: source.to_string(),
                start_point,
            });
        }

        Ok(Self::FromHead)
    }

    #[must_use]
    pub fn describe(&self, branch: &str) -> String {
        match self {
            Self::AttachLocal => format!("Using existing local branch '{}'", branch),
            Self::TrackRemote { upstream } => {
                format!("Creating branch '{}' tracking '{}'", branch, upstream)
            }
            Self::FromSource { source, .. } => {
                format!("Creating new branch '{}' from '{}'", branch, source)
            }
            Self::FromHead => format!("Creating new branch '{}' from HEAD", branch),
        }
    }

    /// Issues the single worktree-creation call for this strategy.
    ///
    /// # Errors
    /// Propagates any failure from the git backend.
    pub fn apply(&self, git: &dyn GitOperations, branch: &str, worktree_path: &Path) -> Result<()> {
        match self {
            Self::AttachLocal => git.add_worktree(branch, worktree_path, None, None),
            Self::TrackRemote { upstream } => {
                let start_point = format!("refs/remotes/{}", upstream);
                git.add_worktree(branch, worktree_path, Some(&start_point), Some(upstream))
            }
            Self::FromSource { start_point, .. } => {
                git.add_worktree(branch, worktree_path, Some(start_point), None)
            }
            Self::FromHead => git.add_worktree(branch, worktree_path, Some("HEAD"), None),
        }
    }
}

/// Maps a source branch to its fully qualified ref, preferring the local branch.
///
/// # Errors
/// Returns a precondition error if the branch exists neither locally nor as a
/// remote-tracking ref.
pub fn resolve_source(git: &dyn GitOperations, source: &str, remote: &str) -> Result<String> {
    if git.local_branch_exists(source)? {
        return Ok(format!("refs/heads/{}", source));
    }
    if git.remote_branch_exists(remote, source)? {
        return Ok(format!("refs/remotes/{}/{}", remote, source));
    }
    anyhow::bail!(SetupError::precondition(format!(
        "Source branch '{}' does not exist locally or on '{}'",
        source, remote
    )))
}


#[cfg(test)]
mod tests {
    use super::fake::FakeGit;
    use super::*;

    #[test]
    fn test_local_branch_wins_over_everything() -> Result<()> {
        let git = FakeGit::default()
            .with_local(&["feature/x", "main"])
            .with_remote(&["origin/feature/x"]);
        let strategy = BranchStrategy::resolve(&git, "feature/x", Some("main"), "origin")?;
        assert_eq!(strategy, BranchStrategy::AttachLocal);
        Ok(())
    }

    #[test]
    fn test_remote_branch_wins_over_source() -> Result<()> {
        let git = FakeGit::default()
            .with_local(&["main"])
            .with_remote(&["origin/feature/x"]);
        let strategy = BranchStrategy::resolve(&git, "feature/x", Some("main"), "origin")?;
        assert_eq!(
            strategy,
            BranchStrategy::TrackRemote {
                upstream: "origin/feature/x".to_string()
            }
        );
        Ok(())
    }

    #[test]
    fn test_remote_lookup_uses_configured_remote() -> Result<()> {
        let git = FakeGit::default().with_remote(&["upstream/feature/x"]);
        assert_eq!(
            BranchStrategy::resolve(&git, "feature/x", None, "origin")?,
            BranchStrategy::FromHead
        );
        assert!(matches!(
            BranchStrategy::resolve(&git, "feature/x", None, "upstream")?,
            BranchStrategy::TrackRemote { .. }
        ));
        Ok(())
    }

    #[test]
    fn test_source_used_when_branch_is_new() -> Result<()> {
        let git = FakeGit::default().with_local(&["main"]);
        let strategy = BranchStrategy::resolve(&git, "feature/x", Some("main"), "origin")?;
        assert_eq!(
            strategy,
            BranchStrategy::FromSource {
                source: "main".to_string(),
                start_point: "refs/heads/main".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_remote_only_source_resolves_to_tracking_ref() -> Result<()> {
        let git = FakeGit::default().with_remote(&["origin/develop"]);
        let strategy = BranchStrategy::resolve(&git, "feature/x", Some("develop"), "origin")?;
        assert_eq!(
            strategy,
            BranchStrategy::FromSource {
                source: "develop".to_string(),
                start_point: "refs/remotes/origin/develop".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_missing_source_is_precondition_error() {
        let git = FakeGit::default().with_local(&["main"]);
        let result = BranchStrategy::resolve(&git, "feature/x", Some("nope"), "origin");
        assert!(matches!(
            result.as_ref().map_err(|e| e.downcast_ref::<SetupError>()),
            Err(Some(SetupError::Precondition(_)))
        ));
    }

    #[test]
    fn test_head_fallback_without_source() -> Result<()> {
        let git = FakeGit::default().with_local(&["main"]);
        let strategy = BranchStrategy::resolve(&git, "feature/x", None, "origin")?;
        assert_eq!(strategy, BranchStrategy::FromHead);
        Ok(())
    }

    #[test]
    fn test_apply_issues_single_call_per_strategy() -> Result<()> {
        let cases = [
            (BranchStrategy::AttachLocal, None, None),
            (
                BranchStrategy::TrackRemote {
                    upstream: "origin/feature/x".to_string(),
                },
                Some("refs/remotes/origin/feature/x"),
                Some("origin/feature/x"),
            ),
            (
                BranchStrategy::FromSource {
                    source: "main".to_string(),
                    start_point: "refs/heads/main".to_string(),
                },
                Some("refs/heads/main"),
                None,
            ),
            (BranchStrategy::FromHead, Some("HEAD"), None),
        ];

        for (strategy, from, upstream) in cases {
            let dir = tempfile::TempDir::new()?;
            let git = FakeGit::default();
            let path = dir.path().join("feature/x");
            strategy.apply(&git, "feature/x", &path)?;

            let calls = git.calls.borrow();
            assert_eq!(calls.len(), 1, "{:?}", strategy);
            assert_eq!(calls[0].new_branch_from.as_deref(), from);
            assert_eq!(calls[0].upstream.as_deref(), upstream);
            assert_eq!(calls[0].path, path);
        }
        Ok(())
    }

    #[test]
    fn test_describe_names_branch_and_origin() {
        let strategy = BranchStrategy::FromSource {
            source: "main".to_string(),
            start_point: "refs/heads/main".to_string(),
        };
        assert_eq!(
            strategy.describe("feature/x"),
            "Creating new branch 'feature/x' from 'main'"
        );
    }
}
