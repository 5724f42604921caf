#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::Result;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Create env files in the repository root that the seeder should pick up
pub fn create_sample_env_files(repo_dir: &assert_fs::fixture::ChildPath) -> Result<()> {
    repo_dir.child(".env").write_str("API_KEY=secret\n")?;
    repo_dir.child(".env.local").write_str("LOCAL_ONLY=1\n")?;
    repo_dir
        .child(".env.development.local")
        .write_str("DEV_ONLY=1\n")?;
    Ok(())
}

/// Create the shared config directory and shared document
pub fn create_shared_config(repo_dir: &assert_fs::fixture::ChildPath) -> Result<()> {
    repo_dir
        .child(".claude")
        .child("settings.json")
        .write_str(r#"{"model": "default"}"#)?;
    repo_dir.child("CLAUDE.md").write_str("# Project notes\n")?;
    Ok(())
}

/// Write a package manifest, optionally declaring a generate script
pub fn create_package_manifest(dir: &assert_fs::fixture::ChildPath, with_generate: bool) -> Result<()> {
    let manifest = if with_generate {
        r#"{"name": "app", "scripts": {"generate": "echo generated > generated.txt"}}"#
    } else {
        r#"{"name": "app", "scripts": {"build": "echo build"}}"#
    };
    dir.child("package.json").write_str(manifest)?;
    Ok(())
}

/// Assert the worktree's env file ends with the title variable for `branch`
pub fn assert_title_line(worktree_path: &assert_fs::fixture::ChildPath, branch: &str) -> Result<()> {
    let env_file = worktree_path.child(".env");
    env_file.assert(predicate::path::is_file());

    let content = std::fs::read_to_string(env_file.path())?;
    let last = content.lines().last().unwrap_or_default();
    assert_eq!(last, format!("APP_TITLE={}", branch));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_helpers() -> Result<()> {
        let temp_dir = assert_fs::TempDir::new()?;
        let repo_dir = temp_dir.child("test_repo");
        repo_dir.create_dir_all()?;

        create_sample_env_files(&repo_dir)?;
        create_shared_config(&repo_dir)?;
        create_package_manifest(&repo_dir, true)?;

        repo_dir
            .child(".env")
            .assert(predicate::str::contains("API_KEY"));
        repo_dir
            .child(".claude/settings.json")
            .assert(predicate::path::is_file());
        repo_dir
            .child("package.json")
            .assert(predicate::str::contains("generate"));

        Ok(())
    }
}
