use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum DsTreeError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },
    #[error("I/O error on {stream}: {source}")]
    Io {
        stream: &'static str,
        source: std::io::Error,
    },
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}
impl DsTreeError {
    pub(crate) fn io(stream: &'static str, source: std::io::Error) -> Self {
        DsTreeError::Io { stream, source }
    }
    /// Process exit code the command-line wrapper uses for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DsTreeError::Spawn { .. } => crate::engine::EXIT_SPAWN_FAILURE,
            DsTreeError::InvalidOption(_) => 2,
            DsTreeError::Io { .. } => 1,
        }
    }
}
