use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use crate::config::InstallSettings;
use crate::error::SetupError;
use crate::output;
use crate::summary::PATH_VAR;
use crate::traits::PackageManager;

/// Package manager driven as a subprocess, e.g. `npm`.
#[derive(Debug, Clone)]
pub struct CommandPackageManager {
    program: String,
    install_args: Vec<String>,
}

impl CommandPackageManager {
    #[must_use]
    pub fn from_settings(settings: &InstallSettings) -> Self {
        Self {
            program: settings.command.clone(),
            install_args: settings.args.clone(),
        }
    }

    fn run(&self, worktree_path: &Path, args: &[String]) -> Result<()> {
        let display = std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        log::debug!("running `{}` in {}", display, worktree_path.display());

        let status = Command::new(&self.program)
            .args(args)
            .current_dir(worktree_path)
            .env(PATH_VAR, worktree_path)
            .status()
            .with_context(|| format!("Failed to run `{}`", display))?;

        if !status.success() {
            anyhow::bail!(SetupError::external(display, status));
        }
        Ok(())
    }
}

impl PackageManager for CommandPackageManager {
    fn install(&self, worktree_path: &Path) -> Result<()> {
        self.run(worktree_path, &self.install_args)
    }

    fn run_script(&self, worktree_path: &Path, script: &str) -> Result<()> {
        self.run(worktree_path, &["run".to_string(), script.to_string()])
    }
}

/// What [`install_dependencies`] ran.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: bool,
    pub generated: bool,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    scripts: BTreeMap<String, serde_json::Value>,
}

/// Runs the install and then the generate script, each only when applicable.
///
/// # Errors
/// Returns an error if the package manager cannot be started or exits nonzero.
pub fn install_dependencies(
    packages: &dyn PackageManager,
    worktree_path: &Path,
    settings: &InstallSettings,
) -> Result<InstallReport> {
    let mut report = InstallReport::default();
    let manifest = worktree_path.join(&settings.manifest);

    output::step("Installing dependencies");
    if manifest.is_file() {
        packages.install(worktree_path)?;
        output::success("Dependencies installed");
        report.installed = true;
    } else {
        output::warning(&format!(
            "No {} in the worktree, skipping install",
            settings.manifest
        ));
    }

    if manifest_declares_script(&manifest, &settings.generate_script)? {
        output::step(&format!("Running {} script", settings.generate_script));
        packages.run_script(worktree_path, &settings.generate_script)?;
        output::success("Generate step finished");
        report.generated = true;
    } else {
        output::warning(&format!(
            "No '{}' script in {}, skipping",
            settings.generate_script, settings.manifest
        ));
    }

    Ok(report)
}

/// Whether the manifest's `scripts` table has an entry named `script`.
fn manifest_declares_script(manifest: &Path, script: &str) -> Result<bool> {
    if script.is_empty() || !manifest.is_file() {
        return Ok(false);
    }

    let content = std::fs::read_to_string(manifest)
        .with_context(|| format!("Failed to read {}", manifest.display()))?;
    match serde_json::from_str::<Manifest>(&content) {
        Ok(parsed) => Ok(parsed.scripts.contains_key(script)),
        Err(e) => {
            output::warning(&format!("Could not parse {}: {}", manifest.display(), e));
            Ok(false)
        }
    }
}
