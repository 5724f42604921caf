use anyhow::{Context, Result};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use crate::cli::{Invocation, SetupRequest};
use crate::commands::interactive;
use crate::config::SetupConfig;
use crate::deps::{self, CommandPackageManager};
use crate::git::GitRepo;
use crate::git::strategy::BranchStrategy;
use crate::output;
use crate::seed;
use crate::selection::{LinePromptProvider, PromptProvider, TerminalPromptProvider};
use crate::storage::WorktreeTarget;
use crate::summary::{self, Summary};
use crate::traits::{GitOperations, PackageManager};

/// How a run ended when no error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(Summary),
    /// The operator declined the confirmation prompt.
    Aborted,
}

/// Collaborators and settings one run works with.
pub struct SetupContext<'a> {
    pub git: &'a dyn GitOperations,
    pub prompter: &'a dyn PromptProvider,
    pub packages: &'a dyn PackageManager,
    pub config: SetupConfig,
    /// Directory an explicit `--base` is relative to.
    pub cwd: PathBuf,
    pub export_file: Option<PathBuf>,
}

/// Runs the whole pipeline against the repository containing the current directory
///
/// # Errors
/// Returns the first failure of any step; see [`run_with`].
pub fn run(invocation: Invocation) -> Result<Outcome> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let git_repo = GitRepo::open(&cwd)?;
    let config = SetupConfig::load_from_repo(&git_repo.repo_root())?;
    let packages = CommandPackageManager::from_settings(&config.install);

    let prompter: Box<dyn PromptProvider> = if io::stdin().is_terminal() {
        Box::new(TerminalPromptProvider)
    } else {
        Box::new(LinePromptProvider::new(io::stdin().lock(), io::stdout()))
    };

    let ctx = SetupContext {
        git: &git_repo,
        prompter: prompter.as_ref(),
        packages: &packages,
        config,
        cwd,
        export_file: summary::export_file_from_env(),
    };
    run_with(&ctx, invocation)
}

/// Runs the pipeline with injected collaborators, stopping at the first error
///
/// # Errors
/// Returns an error if:
/// - Interactive input is invalid (unknown source branch, empty branch name)
/// - The branch name is invalid or the target path already exists
/// - Worktree creation fails
/// - Copying or linking seeded files fails
/// - The install or generate command fails
pub fn run_with(ctx: &SetupContext<'_>, invocation: Invocation) -> Result<Outcome> {
    let repo_root = ctx.git.repo_root();

    let request = match invocation {
        Invocation::Direct(request) => request,
        Invocation::Interactive(options) => {
            let base_dir = resolve_base_dir(ctx, &repo_root, options.base.as_deref());
            match interactive::prompt_for_request(
                ctx.git,
                ctx.prompter,
                &ctx.config,
                &base_dir,
                options,
            )? {
                Some(request) => request,
                None => return Ok(Outcome::Aborted),
            }
        }
    };
    let SetupRequest { branch, options } = request;

    let base_dir = resolve_base_dir(ctx, &repo_root, options.base.as_deref());
    let target = WorktreeTarget::prepare(&base_dir, &branch)?;

    let strategy =
        BranchStrategy::resolve(ctx.git, &branch, options.source.as_deref(), &ctx.config.remote)?;
    output::step(&strategy.describe(&branch));
    strategy.apply(ctx.git, &branch, &target.path)?;
    output::success(&format!("Worktree created at {}", target.path.display()));

    seed::seed_env_files(&repo_root, &target.path, &branch, &ctx.config.env)?;
    seed::link_shared_config(&repo_root, &target.path, &ctx.config.shared)?;

    let install_hint = if options.skip_install {
        output::step("Skipping dependency install and generate step (--no-install)");
        Some(install_command_line(&ctx.config))
    } else {
        deps::install_dependencies(ctx.packages, &target.path, &ctx.config.install)?;
        None
    };

    let summary = Summary {
        branch,
        path: target.path,
        install_hint,
    };
    summary.print();
    summary.export(ctx.export_file.as_deref())?;

    Ok(Outcome::Created(summary))
}

fn resolve_base_dir(ctx: &SetupContext<'_>, repo_root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(base) => ctx.cwd.join(base),
        None => ctx.config.resolve_base_dir(repo_root),
    }
}

fn install_command_line(config: &SetupConfig) -> String {
    std::iter::once(config.install.command.as_str())
        .chain(config.install.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
