//! Asset pipeline error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while deriving a single artifact or bundle.
///
/// Everything except [`AssetError::Combine`] is scoped to one file: the scan
/// driver logs it and moves on.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to transform `{}`: {reason}", path.display())]
    Transform { path: PathBuf, reason: String },

    #[error("failed to write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("bundle `{}` is missing input `{}`", output.display(), input.display())]
    Combine {
        output: PathBuf,
        input: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AssetError {
    pub fn transform(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Transform {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short tag used in log lines.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Transform { .. } => "transform",
            Self::Write { .. } => "write",
            Self::Combine { .. } => "combine",
        }
    }
}
