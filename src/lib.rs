//! # worktree-setup
//!
//! Creates a git worktree for a development branch and seeds it so it is ready
//! to work in: env files copied over, shared config linked, dependencies
//! installed.
//!
//! ## Quick Start
//!
//! ```bash
//! # Choose the source branch and name the new one interactively
//! worktree-setup
//!
//! # New branch feature/x from main, in ../worktrees/feature/x
//! worktree-setup feature/x -s main
//!
//! # Existing branch, custom base directory, no npm install
//! worktree-setup bugfix/issue-123 -b ~/trees -n
//! ```
//!
//! ## Pipeline
//!
//! Each step returns a `Result` and the first error stops the run:
//!
//! 1. parse arguments, or prompt when no branch is given
//! 2. check the repository and the target path
//! 3. create the worktree using the first matching [`git::strategy::BranchStrategy`]
//! 4. copy env files and append the title variable
//! 5. link the shared config directory and copy the shared document
//! 6. install dependencies and run the generate script
//! 7. print the summary and export the worktree path
//!
//! ## Module Structure
//!
//! - [`cli`] - Command-line surface and the resolved invocation
//! - [`commands`] - Pipeline driver and the interactive flow
//! - [`config`] - `.worktree-setup.toml` loading with defaults
//! - [`git`] - Git operations wrapper using git2, plus branch resolution
//! - [`storage`] - Worktree path computation and preflight checks
//! - [`seed`] - Env file copying and shared config linking
//! - [`deps`] - Package manager install and generate step
//! - [`summary`] - Final report and path export
//! - [`selection`] - Prompt abstraction for terminal, piped and scripted input
//! - [`traits`] - Capability traits for git and the package manager
//! - [`output`] - Coloured status lines
//! - [`error`] - Error taxonomy

pub mod cli;
pub mod commands;
pub mod config;
pub mod deps;
pub mod error;
pub mod git;
pub mod output;
pub mod seed;
pub mod selection;
pub mod storage;
pub mod summary;
pub mod traits;

pub use anyhow::Result;
