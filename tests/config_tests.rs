#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

//! Integration tests for `.worktree-setup.toml`

use anyhow::Result;
use assert_fs::prelude::*;
use predicates::prelude::*;

use test_support::CliTestEnvironment;

#[test]
fn test_config_base_dir_relative_to_repository() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.repo_dir
        .child(".worktree-setup.toml")
        .write_str("base-dir = \"../configured\"\n")?;

    env.bare_command()?
        .args(["feature/configured", "-n"])
        .assert()
        .success();

    assert!(env.root().join("configured/feature/configured").is_dir());
    Ok(())
}

#[test]
fn test_config_overrides_env_file_names() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.repo_dir.child(".worktree-setup.toml").write_str(
        "[env]\nprimary = \".env.app\"\nsecondary = \".env.app.secret\"\nvariant-pattern = \"\"\ntitle-var = \"VITE_APP_TITLE\"\n",
    )?;
    env.repo_dir.child(".env.app").write_str("PORT=3000")?;
    env.repo_dir.child(".env.app.secret").write_str("TOKEN=x\n")?;

    env.run_command(&["feature/custom-env", "-n"])?
        .assert()
        .success();

    let worktree_path = env.worktree_path("feature/custom-env");
    // A missing trailing newline is added before the appended lines
    worktree_path.child(".env.app").assert(predicate::str::diff(
        "PORT=3000\n# Added by worktree-setup\nVITE_APP_TITLE=feature/custom-env\n",
    ));
    worktree_path
        .child(".env.app.secret")
        .assert(predicate::str::diff("TOKEN=x\n"));
    Ok(())
}

#[test]
fn test_invalid_config_falls_back_to_defaults() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.repo_dir
        .child(".worktree-setup.toml")
        .write_str("this is = = not toml")?;

    env.run_command(&["feature/bad-config", "-n"])?
        .assert()
        .success()
        .stderr(predicate::str::contains(".worktree-setup.toml"));

    env.worktree_path("feature/bad-config")
        .assert(predicate::path::is_dir());
    Ok(())
}

#[test]
fn test_command_line_base_overrides_config() -> Result<()> {
    let env = CliTestEnvironment::new()?;
    env.repo_dir
        .child(".worktree-setup.toml")
        .write_str("base-dir = \"../configured\"\n")?;

    env.run_command(&["feature/flag-wins", "-n"])?
        .assert()
        .success();

    env.worktree_path("feature/flag-wins")
        .assert(predicate::path::is_dir());
    assert!(!env.root().join("configured").exists());
    Ok(())
}
