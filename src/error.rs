use crate::invoke::InvokeError;
use thiserror::Error;

/// Exit code for downloader launch failures.
pub const DOWNLOADER_ERROR: i32 = 2;
/// Exit code for ffmpeg/ffprobe launch failures.
pub const MEDIA_ERROR: i32 = 3;

/// Top-level error union. Components return these; only `main` decides to
/// terminate the process, using `exit_code`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("output file exists, not overwriting")]
    OverwriteDeclined,
    #[error(transparent)]
    Invoke(#[from] InvokeError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::OverwriteDeclined | Self::Other(_) => 1,
            Self::Invoke(err) => err.exit_code(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.into())
    }
}
