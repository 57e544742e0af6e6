use serde::Serialize;
use std::fmt;

pub type EncodeResult<T> = Result<T, EncodeError>;

/// Closed set of failure kinds surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EncoderUnavailable,
    WorkspaceCreationFailed,
    FrameWriteFailed,
    EmptyInputDirectory,
    MissingBinary,
    InvalidArguments,
    PermissionDenied,
    UnknownEncoderFailure,
}

impl ErrorKind {
    /// Remediation hint suitable for direct display
    pub fn hint(self) -> &'static str {
        match self {
            ErrorKind::EncoderUnavailable => {
                "Install ffmpeg or run the desktop app so the encoder can be located."
            }
            ErrorKind::WorkspaceCreationFailed => {
                "Check free disk space and that the temp directory is writable."
            }
            ErrorKind::FrameWriteFailed => {
                "Check free disk space and temp directory permissions, then try again."
            }
            ErrorKind::EmptyInputDirectory => {
                "Render at least one frame before exporting a GIF."
            }
            ErrorKind::MissingBinary => {
                "The ffmpeg binary could not be started. Reinstall or redownload the application."
            }
            ErrorKind::InvalidArguments => {
                "Check the frame format and output path (PNG frames, writable .gif destination)."
            }
            ErrorKind::PermissionDenied => {
                "Run the application elevated or check permissions on the output folder."
            }
            ErrorKind::UnknownEncoderFailure => {
                "The encoder failed unexpectedly. See the diagnostic details and try again."
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::EncoderUnavailable => "encoder unavailable",
            ErrorKind::WorkspaceCreationFailed => "workspace creation failed",
            ErrorKind::FrameWriteFailed => "frame write failed",
            ErrorKind::EmptyInputDirectory => "empty input directory",
            ErrorKind::MissingBinary => "missing binary",
            ErrorKind::InvalidArguments => "invalid arguments",
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::UnknownEncoderFailure => "unknown encoder failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of one encode call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct EncodeError {
    pub kind: ErrorKind,
    pub message: String,
    pub hint: String,
    /// Raw diagnostic text (stderr tail, I/O error) when there is one
    pub detail: Option<String>,
}

impl EncodeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: kind.hint().to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.detail = if detail.trim().is_empty() {
            None
        } else {
            Some(detail)
        };
        self
    }

    pub fn encoder_unavailable(reason: Option<&str>) -> Self {
        let err = Self::new(ErrorKind::EncoderUnavailable, "GIF encoder is not available");
        match reason {
            Some(r) => err.with_detail(r),
            None => err,
        }
    }

    pub fn workspace_creation_failed(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::WorkspaceCreationFailed,
            "Could not create a temporary working directory",
        )
        .with_detail(detail)
    }

    pub fn frame_write_failed(index: Option<usize>, detail: impl Into<String>) -> Self {
        let message = match index {
            Some(i) => format!("Failed to write frame {}", i),
            None => "Failed to write frames".to_string(),
        };
        Self::new(ErrorKind::FrameWriteFailed, message).with_detail(detail)
    }

    pub fn empty_input() -> Self {
        Self::new(ErrorKind::EmptyInputDirectory, "No frames to encode")
    }

    /// Prefix the message with the pipeline stage that failed
    pub fn in_stage(mut self, stage: &str) -> Self {
        self.message = format!("{} failed: {}", stage, self.message);
        self
    }

    /// Message plus hint, for direct display
    pub fn display_with_hint(&self) -> String {
        format!("{}\nHint: {}", self.message, self.hint)
    }
}
