//! Per-repository settings for the setup pipeline.
//!
//! Settings live in `.worktree-setup.toml` at the repository root. Every key is
//! optional and anything left out keeps its default, so the file only needs to
//! name what differs:
//!
//! ```toml
//! base-dir = "../trees"
//!
//! [env]
//! title-var = "VITE_APP_TITLE"
//!
//! [install]
//! command = "pnpm"
//! args = ["install", "--strict-peer-dependencies=false"]
//! ```
//!
//! A missing, blank or unparsable file falls back to the defaults. Only I/O
//! failures surface as errors.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::output;

pub const CONFIG_FILE_NAME: &str = ".worktree-setup.toml";

/// Complete configuration after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SetupConfig {
    /// Worktree base directory, relative to the repository root unless absolute.
    /// A leading `~/` expands to the home directory.
    pub base_dir: PathBuf,
    /// Source branch offered when HEAD is detached.
    pub fallback_source: String,
    /// Remote whose tracking refs are consulted during branch resolution.
    pub remote: String,
    pub env: EnvSettings,
    pub shared: SharedSettings,
    pub install: InstallSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EnvSettings {
    pub primary: String,
    pub secondary: String,
    /// Glob, relative to the repository root, for additional env variants.
    pub variant_pattern: String,
    /// Variable appended to the worktree's primary env file, set to the branch name.
    pub title_var: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SharedSettings {
    /// Directory symlinked into every worktree.
    pub dir: String,
    /// Document copied into every worktree.
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct InstallSettings {
    pub manifest: String,
    pub command: String,
    pub args: Vec<String>,
    pub generate_script: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("../worktrees"),
            fallback_source: "main".to_string(),
            remote: "origin".to_string(),
            env: EnvSettings::default(),
            shared: SharedSettings::default(),
            install: InstallSettings::default(),
        }
    }
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self {
            primary: ".env".to_string(),
            secondary: ".env.local".to_string(),
            variant_pattern: ".env.*.local".to_string(),
            title_var: "APP_TITLE".to_string(),
        }
    }
}

impl Default for SharedSettings {
    fn default() -> Self {
        Self {
            dir: ".claude".to_string(),
            doc: "CLAUDE.md".to_string(),
        }
    }
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            manifest: "package.json".to_string(),
            command: "npm".to_string(),
            args: vec!["install".to_string(), "--legacy-peer-deps".to_string()],
            generate_script: "generate".to_string(),
        }
    }
}

impl SetupConfig {
    /// Loads `.worktree-setup.toml` from the repository root.
    ///
    /// # Errors
    ///
    /// Only returns an error if the file exists but cannot be read. Parse
    /// errors produce a warning and the default configuration.
    pub fn load_from_repo(repo_path: &Path) -> Result<Self> {
        let config_path = repo_path.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        match toml::from_str::<SetupConfig>(&content) {
            Ok(config) => {
                log::debug!("loaded {}", config_path.display());
                Ok(config)
            }
            Err(e) => {
                output::warning(&format!(
                    "Invalid TOML in {}, using defaults: {}",
                    CONFIG_FILE_NAME,
                    e.to_string().trim()
                ));
                Ok(Self::default())
            }
        }
    }

    /// Resolves the configured base directory against the repository root.
    #[must_use]
    pub fn resolve_base_dir(&self, repo_path: &Path) -> PathBuf {
        let base = expand_home(&self.base_dir);
        if base.is_absolute() {
            base
        } else {
            repo_path.join(base)
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
