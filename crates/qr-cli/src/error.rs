use thiserror::Error;

/// Top-level CLI error, layering the library's own error types with the
/// I/O failures that only make sense at the binary boundary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Png(#[from] qr_render::QrPngError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    /// Process exit code per the documented CLI contract: 2 capacity
    /// overflow, 3 invalid input for mode, 4 I/O error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Png(qr_render::QrPngError::QrError(qr_core::QrError::Capacity {
                ..
            })) => 2,
            CliError::Png(_) => 3,
            CliError::InvalidArgument(_) => 3,
            CliError::Io { .. } => 4,
        }
    }
}
