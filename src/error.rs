use thiserror::Error;

/// Failures that abort the setup pipeline.
///
/// Steps return [`anyhow::Result`] and raise these through `anyhow::bail!`, so
/// callers that care about the category can `downcast_ref::<SetupError>()`.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Malformed command line, or `--help`/`--version` output.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// Something the pipeline requires is missing or already taken.
    #[error("{0}")]
    Precondition(String),

    /// An invoked tool reported failure.
    #[error("`{command}` failed with {status}")]
    ExternalCommand { command: String, status: String },
}

impl SetupError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    pub fn external(command: impl Into<String>, status: impl ToString) -> Self {
        Self::ExternalCommand {
            command: command.into(),
            status: status.to_string(),
        }
    }
}
