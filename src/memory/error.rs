use std::path::PathBuf;

/// Failures of the durable memory layer. Load failures degrade to an empty
/// store; save failures are logged and the in-memory state stays
/// authoritative for the rest of the session.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("failed to read memory file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse memory file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write memory file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize memory state: {source}")]
    Serialize { source: serde_json::Error },
}
