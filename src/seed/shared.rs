use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

use crate::config::SharedSettings;
use crate::output;

/// What [`link_shared_config`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SharedReport {
    pub linked_dir: bool,
    pub copied_doc: bool,
}

/// Symlinks the shared directory and copies the shared document.
///
/// The directory is linked so both trees see the same content; the document
/// is copied and belongs to the worktree afterwards. Either being absent only
/// warns.
///
/// # Errors
/// Returns an error if creating the link or copying the document fails.
pub fn link_shared_config(
    repo_root: &Path,
    worktree_path: &Path,
    settings: &SharedSettings,
) -> Result<SharedReport> {
    output::step("Linking shared configuration");
    let mut report = SharedReport::default();

    if !settings.dir.is_empty() {
        let source = repo_root.join(&settings.dir);
        let link = worktree_path.join(&settings.dir);

        if !source.is_dir() {
            output::warning(&format!(
                "{} not found in {}, nothing to link",
                settings.dir,
                repo_root.display()
            ));
        } else if link.symlink_metadata().is_ok() {
            output::warning(&format!(
                "{} already exists in the worktree, leaving it as is",
                settings.dir
            ));
        } else {
            if let Some(parent) = link.parent() {
                fs::create_dir_all(parent)?;
            }
            symlink_dir(&source, &link).with_context(|| {
                format!(
                    "Failed to link {} -> {}",
                    link.display(),
                    source.display()
                )
            })?;
            output::info(&format!("Linked: {} -> {}", settings.dir, source.display()));
            report.linked_dir = true;
        }
    }

    if !settings.doc.is_empty() {
        let source = repo_root.join(&settings.doc);
        if source.is_file() {
            fs::copy(&source, worktree_path.join(&settings.doc))
                .with_context(|| format!("Failed to copy {}", settings.doc))?;
            output::info(&format!("Copied: {}", settings.doc));
            report.copied_doc = true;
        } else {
            output::warning(&format!(
                "{} not found in {}",
                settings.doc,
                repo_root.display()
            ));
        }
    }

    Ok(report)
}

#[cfg(unix)]
fn symlink_dir(source: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn symlink_dir(source: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(source, link)
}
