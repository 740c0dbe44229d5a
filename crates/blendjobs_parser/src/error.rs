use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = BlendError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BlendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("unexpected end of stream while reading {context}")]
    Truncated { context: &'static str },
    #[error("scene name has no null terminator within {window} bytes")]
    UnterminatedName { window: usize },
    #[error("unsupported compression: {0}")]
    UnsupportedCompression(String),
    #[error("decompression failed: {0}")]
    DecompressionFailed(String),
    #[error("no scene record found")]
    NoSceneRecords,
    #[error("frames per job must be positive, got {0}")]
    InvalidFramesPerJob(u32),
    #[error("scene frame range {start}..={end} contains no frames")]
    EmptyFrameRange { start: i32, end: i32 },
}

/// Coarse classification used by outer layers to pick a response or exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed or truncated input.
    Decode,
    /// The file was readable but held no scene record.
    MissingData,
    /// The path did not resolve.
    NotFound,
    /// Caller supplied an unusable argument or frame range.
    Input,
}

impl BlendError {
    pub fn kind(&self) -> ErrorClass {
        match self {
            BlendError::FileNotFound { .. } => ErrorClass::NotFound,
            BlendError::NoSceneRecords => ErrorClass::MissingData,
            BlendError::InvalidFramesPerJob(_) | BlendError::EmptyFrameRange { .. } => {
                ErrorClass::Input
            }
            BlendError::Io(_)
            | BlendError::Truncated { .. }
            | BlendError::UnterminatedName { .. }
            | BlendError::UnsupportedCompression(_)
            | BlendError::DecompressionFailed(_) => ErrorClass::Decode,
        }
    }

    /// Map an `UnexpectedEof` from `read_exact` to a `Truncated` error naming what was being read.
    pub(crate) fn eof_as_truncated(err: std::io::Error, context: &'static str) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            BlendError::Truncated { context }
        } else {
            BlendError::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        assert_eq!(BlendError::NoSceneRecords.kind(), ErrorClass::MissingData);
        assert_eq!(
            BlendError::FileNotFound {
                path: PathBuf::from("/missing.blend")
            }
            .kind(),
            ErrorClass::NotFound
        );
        assert_eq!(
            BlendError::UnterminatedName { window: 64 }.kind(),
            ErrorClass::Decode
        );
        assert_eq!(BlendError::InvalidFramesPerJob(0).kind(), ErrorClass::Input);
    }

    #[test]
    fn test_eof_maps_to_truncated() {
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(
            BlendError::eof_as_truncated(eof, "record header"),
            BlendError::Truncated {
                context: "record header"
            }
        ));

        let other = std::io::Error::other("boom");
        assert!(matches!(
            BlendError::eof_as_truncated(other, "record header"),
            BlendError::Io(_)
        ));
    }

    #[test]
    fn test_display_messages() {
        let err = BlendError::FileNotFound {
            path: PathBuf::from("/tmp/scene.blend"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/scene.blend");
        assert_eq!(
            BlendError::EmptyFrameRange { start: 5, end: 4 }.to_string(),
            "scene frame range 5..=4 contains no frames"
        );
    }
}
