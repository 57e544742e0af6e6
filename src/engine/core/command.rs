//! Encoder command construction.
//!
//! Pure string building: no filesystem access, no process spawning. The frame
//! pattern keeps the host's native separator because ffmpeg's image2 demuxer expands
//! it literally; every other path is emitted with forward slashes.

use super::error::{EncodeError, EncodeResult, ErrorKind};
use super::frames::FRAME_PATTERN;
use super::types::{CommandPair, EncodeCommand, EncodeOptions};
use std::path::Path;

pub const PALETTE_FILE_NAME: &str = "palette.png";

const PALETTE_USE_PROFILE: &str = "dither=bayer:bayer_scale=5:diff_mode=rectangle";
const ALPHA_THRESHOLD: u32 = 128;

/// Path separator convention of the host that will run the commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Posix,
    Windows,
}

impl PathStyle {
    pub fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    fn separator(self) -> char {
        match self {
            PathStyle::Posix => '/',
            PathStyle::Windows => '\\',
        }
    }
}

/// Canonical forward-slash form. Backslashes are only separators on Windows.
pub fn to_forward_slashes(path: &str, style: PathStyle) -> String {
    match style {
        PathStyle::Windows => path.replace('\\', "/"),
        PathStyle::Posix => path.to_string(),
    }
}

fn to_native(path: &str, style: PathStyle) -> String {
    match style {
        PathStyle::Windows => path.replace('/', "\\"),
        PathStyle::Posix => path.to_string(),
    }
}

fn join(dir: &str, file: &str, sep: char) -> String {
    if dir.is_empty() {
        return file.to_string();
    }
    let trimmed = dir.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() && dir.starts_with(['/', '\\']) {
        // dir was the root itself
        format!("{}{}", sep, file)
    } else {
        format!("{}{}{}", trimmed, sep, file)
    }
}

/// Wildcard input pattern for the materialized frames, native separators
pub fn frame_pattern(workspace_dir: &Path, style: PathStyle) -> String {
    let dir = to_native(&workspace_dir.to_string_lossy(), style);
    join(&dir, FRAME_PATTERN, style.separator())
}

/// Palette artifact location inside the workspace, forward slashes
pub fn palette_path(workspace_dir: &Path, style: PathStyle) -> String {
    let dir = to_forward_slashes(&workspace_dir.to_string_lossy(), style);
    join(&dir, PALETTE_FILE_NAME, '/')
}

/// Shell-quote one argument so the bridge can re-split the string with POSIX rules.
///
/// Backslashes survive the round trip. A NUL byte cannot be passed to a process.
pub fn quote_arg(arg: &str) -> EncodeResult<String> {
    shlex::try_quote(arg)
        .map(|quoted| quoted.into_owned())
        .map_err(|e| {
            EncodeError::new(
                ErrorKind::InvalidArguments,
                "Encoder argument contains a NUL byte",
            )
            .with_detail(format!("{}: {:?}", e, arg))
        })
}

pub fn palette_filter(options: &EncodeOptions) -> String {
    let mut filter = String::from("palettegen=stats_mode=diff");
    if let Some(colors) = options.quality.max_colors() {
        filter.push_str(&format!(":max_colors={}", colors));
    }
    filter.push_str(if options.transparent {
        ":reserve_transparent=1"
    } else {
        ":reserve_transparent=0"
    });
    filter
}

pub fn palette_use_filter(options: &EncodeOptions) -> String {
    let mut filter = format!("[0:v][1:v]paletteuse={}", PALETTE_USE_PROFILE);
    if options.transparent {
        filter.push_str(&format!(":alpha_threshold={}", ALPHA_THRESHOLD));
    }
    filter
}

/// Build the palette-generation and palette-application commands.
///
/// The pair carries no ordering; running palette before GIF is the caller's job.
pub fn build_commands(
    encoder_path: &str,
    workspace_dir: &Path,
    output_path: &Path,
    options: &EncodeOptions,
    style: PathStyle,
) -> EncodeResult<CommandPair> {
    let encoder = quote_arg(&to_forward_slashes(encoder_path, style))?;
    let pattern = quote_arg(&frame_pattern(workspace_dir, style))?;
    let palette = quote_arg(&palette_path(workspace_dir, style))?;
    let output = quote_arg(&to_forward_slashes(&output_path.to_string_lossy(), style))?;
    let fps = options.effective_fps();

    let palette_cmd = format!(
        "{} -y -v error -framerate {} -i {} -vf {} -update 1 {}",
        encoder,
        fps,
        pattern,
        quote_arg(&palette_filter(options))?,
        palette
    );

    let loop_flag = if options.loop_forever { "0" } else { "-1" };
    let gif_cmd = format!(
        "{} -y -v error -framerate {} -i {} -i {} -lavfi {} -loop {} {}",
        encoder,
        fps,
        pattern,
        palette,
        quote_arg(&palette_use_filter(options))?,
        loop_flag,
        output
    );

    Ok(CommandPair {
        palette: EncodeCommand::new(palette_cmd),
        gif: EncodeCommand::new(gif_cmd),
    })
}

/// Version query for the resolved encoder
pub fn version_command(encoder_path: &str, style: PathStyle) -> EncodeResult<EncodeCommand> {
    let encoder = quote_arg(&to_forward_slashes(encoder_path, style))?;
    Ok(EncodeCommand::new(format!("{} -version", encoder)))
}
