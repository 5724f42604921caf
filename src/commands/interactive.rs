use anyhow::Result;
use std::path::Path;

use crate::cli::{SetupOptions, SetupRequest};
use crate::config::SetupConfig;
use crate::error::SetupError;
use crate::git::strategy;
use crate::selection::PromptProvider;
use crate::storage;
use crate::traits::GitOperations;

/// Local branches listed before the rest are summarized as a count.
pub const MAX_LISTED_BRANCHES: usize = 10;

/// Walks the operator through choosing a source branch and naming the new one.
///
/// Returns `None` when the operator declines the final confirmation. Nothing
/// on disk is touched here.
///
/// # Errors
/// Returns an error if:
/// - Git lookups fail
/// - The source branch exists neither locally nor on the configured remote
/// - The new branch name is empty
/// - Reading input fails
pub fn prompt_for_request(
    git: &dyn GitOperations,
    prompter: &dyn PromptProvider,
    config: &SetupConfig,
    base_dir: &Path,
    options: SetupOptions,
) -> Result<Option<SetupRequest>> {
    show_branches(git, prompter)?;
    show_worktrees(git, prompter)?;

    let default_source = match &options.source {
        Some(source) => source.clone(),
        None => git
            .current_branch()?
            .unwrap_or_else(|| config.fallback_source.clone()),
    };

    let answer = prompter.ask("Source branch:", Some(&default_source))?;
    let source = if answer.is_empty() {
        default_source
    } else {
        answer
    };
    strategy::resolve_source(git, &source, &config.remote)?;

    let branch = prompter.ask("New branch name:", None)?;
    if branch.is_empty() {
        anyhow::bail!(SetupError::precondition("Branch name cannot be empty"));
    }

    prompter.show("");
    prompter.show("About to create:");
    prompter.show(&format!("  Source branch: {}", source));
    prompter.show(&format!("  New branch:    {}", branch));
    prompter.show(&format!(
        "  Path:          {}",
        storage::preview_path(base_dir, &branch).display()
    ));
    if options.skip_install {
        prompter.show("  Dependencies:  skipped");
    }

    if !prompter.confirm("Proceed? [Y/n]")? {
        prompter.show("Aborted.");
        return Ok(None);
    }

    Ok(Some(SetupRequest {
        branch,
        options: SetupOptions {
            source: Some(source),
            ..options
        },
    }))
}

fn show_branches(git: &dyn GitOperations, prompter: &dyn PromptProvider) -> Result<()> {
    let branches = git.list_local_branches()?;

    prompter.show("Local branches:");
    if branches.is_empty() {
        prompter.show("  (none)");
    }
    for branch in branches.iter().take(MAX_LISTED_BRANCHES) {
        prompter.show(&format!("  {}", branch));
    }
    if branches.len() > MAX_LISTED_BRANCHES {
        prompter.show(&format!(
            "  ... and {} more",
            branches.len() - MAX_LISTED_BRANCHES
        ));
    }
    prompter.show("");
    Ok(())
}

fn show_worktrees(git: &dyn GitOperations, prompter: &dyn PromptProvider) -> Result<()> {
    let worktrees = git.list_worktrees()?;

    prompter.show("Existing worktrees:");
    for worktree in &worktrees {
        prompter.show(&format!("  {:<24} {}", worktree.name, worktree.path.display()));
    }
    prompter.show("");
    Ok(())
}
