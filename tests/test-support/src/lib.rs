//! Test support utilities for worktree-setup integration tests
//!
//! Shared fixtures for tests that drive the real binary against throwaway git
//! repositories. Used only during development and testing, not published.

pub mod patterns;
pub mod test_env;

pub use patterns::{assert_title_line, create_package_manifest, create_sample_env_files, create_shared_config};
pub use test_env::CliTestEnvironment;
