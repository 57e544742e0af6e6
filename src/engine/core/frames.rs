use super::error::{EncodeError, EncodeResult};
use super::types::Frame;
use super::workspace::Workspace;
use crate::engine::bridge::{BridgeError, DesktopBridge, FrameFile};

pub const FRAME_EXTENSION: &str = "png";

/// Input pattern matching the names produced by [`frame_file_name`]
pub const FRAME_PATTERN: &str = "frame_%04d.png";

/// Zero-padded name for the frame at `index`
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{:04}.{}", index, FRAME_EXTENSION)
}

/// Persist frames into the workspace, index i landing in the i-th name slot.
///
/// Partial writes are left in place; releasing the workspace removes them.
pub async fn materialize(
    bridge: &dyn DesktopBridge,
    frames: &[Frame],
    workspace: &Workspace,
) -> EncodeResult<()> {
    let names: Vec<String> = (0..frames.len()).map(frame_file_name).collect();
    let files: Vec<FrameFile<'_>> = frames
        .iter()
        .zip(&names)
        .enumerate()
        .map(|(index, (frame, name))| FrameFile {
            index,
            name,
            bytes: &frame.bytes,
        })
        .collect();

    tracing::debug!(
        count = files.len(),
        dir = %workspace.path().display(),
        "writing frames"
    );

    bridge
        .persist_frames(workspace.path(), &files)
        .await
        .map_err(|e| match e {
            BridgeError::FrameWrite { index, message } => {
                EncodeError::frame_write_failed(Some(index), message)
            }
            other => EncodeError::frame_write_failed(None, other.to_string()),
        })
}
