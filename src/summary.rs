use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Variable carrying the new worktree path to subprocesses and the calling shell.
pub const PATH_VAR: &str = "WORKTREE_PATH";

/// When set, names a file that receives `export WORKTREE_PATH=...` so a
/// wrapping shell function can source it after the run.
pub const EXPORT_FILE_ENV: &str = "WORKTREE_SETUP_EXPORT_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub branch: String,
    pub path: PathBuf,
    /// Install command to suggest when the install step was skipped.
    pub install_hint: Option<String>,
}

impl Summary {
    #[must_use]
    pub fn render(&self) -> String {
        let path = shell_quote(&self.path.to_string_lossy());
        let mut lines = vec![
            String::new(),
            "Worktree ready".green().bold().to_string(),
            format!("  Path:   {}", self.path.display()),
            format!("  Branch: {}", self.branch),
            String::new(),
            "Next steps:".bold().to_string(),
            format!("  cd {}", path),
        ];
        if let Some(hint) = &self.install_hint {
            lines.push(format!("  {}   # dependencies were not installed", hint));
        }
        lines.extend([
            String::new(),
            "When you are done:".bold().to_string(),
            format!("  git worktree remove {}", path),
            format!("  git branch -d {}", shell_quote(&self.branch)),
            String::new(),
            format!("  export {}={}", PATH_VAR, path),
        ]);
        lines.join("\n")
    }

    pub fn print(&self) {
        println!("{}", self.render());
    }

    /// Appends `export WORKTREE_PATH=<path>` to `export_file`, if given.
    ///
    /// # Errors
    /// Returns an error if the export file cannot be opened or written.
    pub fn export(&self, export_file: Option<&Path>) -> Result<()> {
        let Some(export_file) = export_file else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(export_file)
            .with_context(|| format!("Failed to open {}", export_file.display()))?;
        writeln!(
            file,
            "export {}={}",
            PATH_VAR,
            shell_quote(&self.path.to_string_lossy())
        )
        .with_context(|| format!("Failed to write {}", export_file.display()))?;
        log::debug!("exported {} to {}", PATH_VAR, export_file.display());
        Ok(())
    }
}

/// Reads [`EXPORT_FILE_ENV`], ignoring an empty value.
#[must_use]
pub fn export_file_from_env() -> Option<PathBuf> {
    std::env::var_os(EXPORT_FILE_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Quotes for POSIX shells when the value contains anything unusual.
fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+=:@,".contains(c));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
