#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::prelude::*;

use std::process::Command;

/// Test environment with a real git repository and a worktree base directory
pub struct CliTestEnvironment {
    pub repo_dir: assert_fs::fixture::ChildPath,
    pub base_dir: assert_fs::fixture::ChildPath,
    temp_dir: TempDir, // Private so cleanup happens when the environment drops
}

impl CliTestEnvironment {
    /// Creates a new test environment with a real git repository on `main`
    ///
    /// The base directory is not created; the binary creates it on demand.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize git repository
    /// - Failed to configure git settings
    /// - Failed to create initial commit
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let repo_dir = temp_dir.child("test_repo");
        let base_dir = temp_dir.child("worktrees");

        repo_dir.create_dir_all()?;

        Self::git(&repo_dir, &["init"])?;
        Self::git(&repo_dir, &["config", "user.name", "Test User"])?;
        Self::git(&repo_dir, &["config", "user.email", "test@example.com"])?;

        repo_dir.child("README.md").write_str("# Test Repo")?;
        repo_dir
            .child(".gitignore")
            .write_str(".env\n.env.local\n.env.*.local\n.claude/\nCLAUDE.md\n")?;
        Self::git(&repo_dir, &["add", "."])?;
        Self::git(&repo_dir, &["commit", "-m", "Initial commit"])?;

        // Some git versions default to 'master'
        Self::git(&repo_dir, &["branch", "-M", "main"])?;

        Ok(Self {
            repo_dir,
            base_dir,
            temp_dir,
        })
    }

    /// Path of the temporary root holding the repository and base directory
    pub fn root(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// Run a git command in the repository directory
    ///
    /// # Errors
    /// Returns an error if git cannot be started or exits nonzero
    pub fn git(repo_path: &assert_fs::fixture::ChildPath, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path.path())
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git command failed: {}", stderr);
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git in the test repository
    ///
    /// # Errors
    /// Returns an error if git fails
    pub fn repo_git(&self, args: &[&str]) -> Result<String> {
        Self::git(&self.repo_dir, args)
    }

    /// Build a command for the binary, run from the repository with `--base`
    /// pointing at the test base directory
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd = self.bare_command()?;
        cmd.arg("--base").arg(self.base_dir.path());
        cmd.args(args);
        Ok(cmd)
    }

    /// Build a command for the binary without any arguments preset
    ///
    /// # Errors
    /// Returns an error if the binary cannot be found
    pub fn bare_command(&self) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("worktree-setup")
            .context("Failed to find worktree-setup binary")?;

        cmd.current_dir(self.repo_dir.path())
            .env_remove("WORKTREE_BASE")
            .env_remove("WORKTREE_SETUP_EXPORT_FILE")
            .env("NO_COLOR", "1");
        Ok(cmd)
    }

    /// Get the path to a worktree within the base directory
    pub fn worktree_path(&self, branch_name: &str) -> assert_fs::fixture::ChildPath {
        self.base_dir.child(branch_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.repo_dir.assert(predicate::path::is_dir());
        env.repo_dir.child(".git").assert(predicate::path::exists());
        env.repo_dir
            .child("README.md")
            .assert(predicate::str::contains("# Test Repo"));
        assert_eq!(env.repo_git(&["branch", "--show-current"])?, "main");

        env.base_dir.assert(predicate::path::missing());

        Ok(())
    }

    #[test]
    fn test_worktree_path_nests_branch_segments() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        let path = env.worktree_path("feature/test-branch");
        assert!(path.path().ends_with("worktrees/feature/test-branch"));

        Ok(())
    }
}
