//! Files carried from the main checkout into a new worktree.
//!
//! - [`env_files`] copies gitignored env files and stamps the branch title
//! - [`shared`] links the shared config directory and copies the shared doc

pub mod env_files;
pub mod shared;

pub use env_files::seed_env_files;
pub use shared::link_shared_config;
