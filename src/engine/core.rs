mod classify;
mod command;
mod error;
mod frames;
mod log;
mod orchestrator;
mod probe;
mod types;
mod workspace;

pub use classify::{classify, classify_exit, classify_kind};
pub use command::{
    PALETTE_FILE_NAME, PathStyle, build_commands, frame_pattern, palette_filter, palette_path,
    palette_use_filter, quote_arg, to_forward_slashes, version_command,
};
pub use error::{EncodeError, EncodeResult, ErrorKind};
pub use frames::{FRAME_EXTENSION, FRAME_PATTERN, frame_file_name, materialize};
pub use log::{DEBUG_LOG_FILE, write_debug_log};
pub use orchestrator::{EncodeStage, TwoPassOrchestrator};
pub use probe::{parse_version_line, probe, query_version};
pub use types::{
    CommandPair, DEFAULT_FPS, EncodeCommand, EncodeOptions, EncoderHandle, EncoderStatus, Frame,
    Quality,
};
pub use workspace::{Workspace, acquire, release};
