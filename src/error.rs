use std::path::PathBuf;

pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Errors raised by the media layer and the configuration loader.
///
/// The sync controller never lets these reach the user; it logs and moves on.
#[derive(thiserror::Error, Debug)]
pub enum PlaybackError {
    #[error("failed to load video: {0}")]
    Load(String),

    #[error("invalid video path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("seek to {target:.3}s failed: {reason}")]
    Seek { target: f64, reason: String },

    #[error("autoplay rejected: {0}")]
    AutoplayRejected(String),

    #[error("config error: {0}")]
    Config(String),
}

impl PlaybackError {
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn seek(target: f64, reason: impl Into<String>) -> Self {
        Self::Seek {
            target,
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
