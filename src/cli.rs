use clap::{Parser, ValueHint};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::SetupError;

const AFTER_HELP: &str = "\
Examples:
  worktree-setup                         Choose branches interactively
  worktree-setup feature/login           Worktree for feature/login
  worktree-setup feature/x -s main       New branch feature/x from main
  worktree-setup bugfix/issue-123 -n     Skip npm install and generate";

#[derive(Parser, Debug)]
#[command(name = "worktree-setup")]
#[command(about = "Create a git worktree seeded with env files, shared config and dependencies")]
#[command(version, after_help = AFTER_HELP)]
pub struct Cli {
    /// Branch for the worktree. Omit to choose interactively
    #[arg(value_hint = ValueHint::Other)]
    pub branch: Option<String>,
    /// Source branch to create a new branch from
    #[arg(short, long, value_name = "BRANCH", value_hint = ValueHint::Other)]
    pub source: Option<String>,
    /// Directory that holds the worktrees [default: ../worktrees next to the repository]
    #[arg(short, long, value_name = "PATH", env = "WORKTREE_BASE", value_hint = ValueHint::DirPath)]
    pub base: Option<PathBuf>,
    /// Skip dependency install and the generate step
    #[arg(short = 'n', long)]
    pub no_install: bool,
}

/// Settings shared by both modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupOptions {
    pub source: Option<String>,
    /// Explicit base directory, relative to the current directory.
    pub base: Option<PathBuf>,
    pub skip_install: bool,
}

/// Fully resolved invocation config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupRequest {
    pub branch: String,
    pub options: SetupOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Branch given on the command line.
    Direct(SetupRequest),
    /// No branch given; ask for one.
    Interactive(SetupOptions),
}

impl From<Cli> for Invocation {
    fn from(cli: Cli) -> Self {
        let options = SetupOptions {
            source: cli.source,
            base: cli.base,
            skip_install: cli.no_install,
        };
        match cli.branch {
            Some(branch) => Self::Direct(SetupRequest { branch, options }),
            None => Self::Interactive(options),
        }
    }
}

/// Parses command-line tokens (including the program name).
///
/// # Errors
/// Returns [`SetupError::Usage`] for unknown flags, extra positionals, and
/// `--help`/`--version`.
pub fn parse_invocation<I, T>(args: I) -> Result<Invocation, SetupError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    Ok(cli.into())
}
