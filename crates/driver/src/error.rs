use canvaswalk_kernel::KernelError;
use std::path::PathBuf;

/// Errors from configuration loading and the frame loop.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error("host failure: {0}")]
    Host(#[from] std::io::Error),
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("driver already ran; create a new one")]
    AlreadyStarted,
}
