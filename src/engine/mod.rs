// GIF encoding engine - independent of the CLI

pub mod bridge;
pub mod core;
pub mod handler;
pub mod local;

pub use bridge::{BridgeError, CommandOutput, DesktopBridge, DetachedBridge, EncoderAvailability};
pub use self::core::*;
pub use handler::{GifHandler, IN_MEMORY_OUTPUT_NAME, PREVIEW_WORKSPACE_DIR};
pub use local::LocalBridge;
