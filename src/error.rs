//! # Error Handling
//!
//! Error type for the file-level resize workflow. Each variant carries enough
//! context (field, path, operation) to produce a useful one-line message, and
//! [`JpegResizeError::category`] gives a stable tag for logging.
//!
//! Errors raised inside the streaming core arrive as
//! [`jpegresize_core::ResampleError`] and are wrapped, not flattened, so the
//! source chain stays intact.
//!
//! ## Usage
//!
//! ```rust
//! use jpegresize::error::JpegResizeError;
//!
//! let error = JpegResizeError::config("radius", "-1", "must be greater than 0");
//! assert_eq!(error.category(), "config");
//! assert!(error.to_string().contains("radius"));
//! ```

use std::{error::Error as StdError, fmt, path::PathBuf};

use jpegresize_core::ResampleError;

/// Convenience alias for results in this crate.
pub type ResizeResult<T> = Result<T, JpegResizeError>;

#[derive(Debug)]
pub enum JpegResizeError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
    },
    /// Input could not be opened or decoded
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// Output could not be encoded
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    /// I/O errors outside the codec
    Io {
        operation: String,
        path: Option<PathBuf>,
        source: std::io::Error,
    },
    /// Image layout the JPEG adapters cannot carry
    UnsupportedLayout { channels: usize, reason: String },
    /// Failure inside the streaming resampler
    Resample(ResampleError),
}

impl JpegResizeError {
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn io(operation: impl Into<String>, path: Option<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path,
            source,
        }
    }

    /// Short category tag, stable across messages.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Decode { .. } => "decode",
            Self::Encode { .. } => "encode",
            Self::Io { .. } => "io",
            Self::UnsupportedLayout { .. } => "layout",
            Self::Resample(_) => "resample",
        }
    }
}

impl fmt::Display for JpegResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config {
                field,
                value,
                reason,
            } => write!(f, "Invalid {} '{}': {}", field, value, reason),
            Self::Decode { path, source } => {
                write!(f, "Can't read {}: {}", path.display(), source)
            }
            Self::Encode { path, source } => {
                write!(f, "Can't write {}: {}", path.display(), source)
            }
            Self::Io {
                operation,
                path: Some(path),
                source,
            } => write!(f, "{} failed for {}: {}", operation, path.display(), source),
            Self::Io {
                operation,
                path: None,
                source,
            } => write!(f, "{} failed: {}", operation, source),
            Self::UnsupportedLayout { channels, reason } => {
                write!(f, "Unsupported image with {} component(s): {}", channels, reason)
            }
            Self::Resample(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for JpegResizeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Decode { source, .. } | Self::Encode { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Resample(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResampleError> for JpegResizeError {
    fn from(e: ResampleError) -> Self {
        Self::Resample(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(JpegResizeError::config("a", "b", "c").category(), "config");
        let io = JpegResizeError::io(
            "create output",
            Some(PathBuf::from("/nope/out.jpg")),
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(io.category(), "io");
        assert!(io.to_string().contains("/nope/out.jpg"));
        assert!(io.source().is_some());
    }

    #[test]
    fn test_resample_error_is_wrapped() {
        let err: JpegResizeError = ResampleError::Truncated { row: 7 }.into();
        assert_eq!(err.category(), "resample");
        assert!(err.to_string().contains("line 7"));
        assert!(err.source().is_some());
    }
}
