use super::error::{EncodeError, EncodeResult};
use crate::engine::bridge::DesktopBridge;
use std::path::{Path, PathBuf};

/// Temporary directory owned by exactly one in-flight encode call.
///
/// Deliberately neither `Clone` nor `Copy`: [`release`] takes it by value, so a
/// workspace cannot be released twice or used after release.
#[derive(Debug, PartialEq, Eq)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub async fn acquire(bridge: &dyn DesktopBridge) -> EncodeResult<Workspace> {
    match bridge.create_temp_directory().await {
        Ok(path) => {
            tracing::debug!(dir = %path.display(), "workspace acquired");
            Ok(Workspace { path })
        }
        Err(e) => Err(EncodeError::workspace_creation_failed(e.to_string())),
    }
}

/// Best-effort recursive delete. Never fails; problems are only logged.
pub async fn release(bridge: &dyn DesktopBridge, workspace: Workspace) {
    match bridge.remove_directory(&workspace.path).await {
        Ok(()) => tracing::debug!(dir = %workspace.path.display(), "workspace released"),
        Err(e) => tracing::warn!(
            dir = %workspace.path.display(),
            error = %e,
            "failed to remove workspace"
        ),
    }
}
