//! Request/response surface of the privileged execution context.
//!
//! The pipeline never spawns processes or touches the filesystem itself; every side
//! effect goes through a [`DesktopBridge`]. Implementations: [`crate::engine::local::LocalBridge`]
//! for a real host, [`DetachedBridge`] for contexts without one, and test doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No privileged context is reachable (headless / non-desktop execution)
    #[error("desktop bridge is not available")]
    Unavailable,

    #[error("{op} failed: {message}")]
    Io { op: &'static str, message: String },

    #[error("failed to write frame {index}: {message}")]
    FrameWrite { index: usize, message: String },

    /// The process could not be started at all
    #[error("failed to run process: {0}")]
    Process(String),
}

impl BridgeError {
    pub fn io(op: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Io {
            op,
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderAvailability {
    pub is_available: bool,
    pub path: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// One frame handed to the bridge for persisting, already named
#[derive(Debug, Clone, Copy)]
pub struct FrameFile<'a> {
    pub index: usize,
    pub name: &'a str,
    pub bytes: &'a [u8],
}

#[async_trait]
pub trait DesktopBridge: Send + Sync {
    async fn check_encoder_availability(&self) -> Result<EncoderAvailability, BridgeError>;

    /// Create a fresh, uniquely named directory
    async fn create_temp_directory(&self) -> Result<PathBuf, BridgeError>;

    /// Write frames in slice order; stops at the first failing write
    async fn persist_frames(
        &self,
        dir: &Path,
        frames: &[FrameFile<'_>],
    ) -> Result<(), BridgeError>;

    async fn run_command(&self, command: &str) -> Result<CommandOutput, BridgeError>;

    /// Number of regular files in `dir` with the given extension
    async fn count_files(&self, dir: &Path, extension: &str) -> Result<usize, BridgeError>;

    async fn remove_directory(&self, dir: &Path) -> Result<(), BridgeError>;

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, BridgeError>;
}

/// Bridge for execution contexts with no privileged side; everything is unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedBridge;

#[async_trait]
impl DesktopBridge for DetachedBridge {
    async fn check_encoder_availability(&self) -> Result<EncoderAvailability, BridgeError> {
        Err(BridgeError::Unavailable)
    }

    async fn create_temp_directory(&self) -> Result<PathBuf, BridgeError> {
        Err(BridgeError::Unavailable)
    }

    async fn persist_frames(
        &self,
        _dir: &Path,
        _frames: &[FrameFile<'_>],
    ) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable)
    }

    async fn run_command(&self, _command: &str) -> Result<CommandOutput, BridgeError> {
        Err(BridgeError::Unavailable)
    }

    async fn count_files(&self, _dir: &Path, _extension: &str) -> Result<usize, BridgeError> {
        Err(BridgeError::Unavailable)
    }

    async fn remove_directory(&self, _dir: &Path) -> Result<(), BridgeError> {
        Err(BridgeError::Unavailable)
    }

    async fn read_file(&self, _path: &Path) -> Result<Vec<u8>, BridgeError> {
        Err(BridgeError::Unavailable)
    }
}
