use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::EnvSettings;
use crate::output;

/// Comment line written above the generated title variable.
pub const GENERATED_MARKER: &str = "# Added by worktree-setup";

/// Copies env files from the repository root and appends the title variable.
///
/// Missing files only warn. The worktree's primary env file always ends with
/// `<title_var>=<branch>`, whether or not anything was copied.
///
/// # Errors
/// Returns an error if a copy fails, the variant glob is invalid, or the
/// primary env file cannot be written.
pub fn seed_env_files(
    repo_root: &Path,
    worktree_path: &Path,
    branch: &str,
    settings: &EnvSettings,
) -> Result<Vec<PathBuf>> {
    output::step("Copying environment files");

    let mut copied: Vec<PathBuf> = Vec::new();

    for name in [&settings.primary, &settings.secondary] {
        if name.is_empty() {
            continue;
        }
        let source = repo_root.join(name);
        if source.is_file() {
            copy_into(&source, &worktree_path.join(name))?;
            output::info(&format!("Copied: {}", name));
            copied.push(PathBuf::from(name));
        } else {
            output::warning(&format!("{} not found in {}", name, repo_root.display()));
        }
    }

    for source in find_variants(repo_root, &settings.variant_pattern)? {
        let relative = source.strip_prefix(repo_root)?.to_path_buf();
        if copied.contains(&relative) {
            continue;
        }
        copy_into(&source, &worktree_path.join(&relative))?;
        output::info(&format!("Copied: {}", relative.display()));
        copied.push(relative);
    }

    if copied.is_empty() {
        output::warning("No environment files were copied");
    }

    let env_file = worktree_path.join(&settings.primary);
    append_title_var(&env_file, &settings.title_var, branch)?;
    output::info(&format!(
        "Set {}={} in {}",
        settings.title_var, branch, settings.primary
    ));

    Ok(copied)
}

fn find_variants(repo_root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let full_pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&repo_root.to_string_lossy()),
        pattern
    );
    let options = glob::MatchOptions {
        require_literal_leading_dot: false,
        ..glob::MatchOptions::new()
    };

    let mut matches = Vec::new();
    for entry in glob::glob_with(&full_pattern, options)
        .with_context(|| format!("Invalid env variant pattern: {}", pattern))?
    {
        let path = entry?;
        if path.is_file() {
            matches.push(path);
        }
    }
    matches.sort();
    Ok(matches)
}

fn copy_into(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)
        .with_context(|| format!("Failed to copy {}", source.display()))?;
    Ok(())
}

/// Appends the marker and `<var>=<branch>`, creating the file if needed.
fn append_title_var(env_file: &Path, var: &str, branch: &str) -> Result<()> {
    let needs_newline = match fs::read(env_file) {
        Ok(bytes) => !bytes.is_empty() && !bytes.ends_with(b"\n"),
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", env_file.display()));
        }
    };

    let mut block = String::new();
    if needs_newline {
        block.push('\n');
    }
    block.push_str(GENERATED_MARKER);
    block.push('\n');
    block.push_str(&format!("{}={}\n", var, branch));

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(env_file)
        .with_context(|| format!("Failed to open {}", env_file.display()))?;
    file.write_all(block.as_bytes())
        .with_context(|| format!("Failed to write {}", env_file.display()))?;
    Ok(())
}
