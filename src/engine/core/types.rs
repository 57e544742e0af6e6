use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_FPS: u32 = 15;

/// Resolved external encoder, produced once by the availability probe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderHandle {
    pub path: Option<String>,
    pub available: bool,
    pub error: Option<String>,
}

impl EncoderHandle {
    pub fn unavailable(error: Option<String>) -> Self {
        Self {
            path: None,
            available: false,
            error,
        }
    }

    /// Encoder path, only when the probe found a usable binary
    pub fn usable_path(&self) -> Option<&str> {
        if self.available {
            self.path.as_deref().filter(|p| !p.is_empty())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    /// Palette color cap; `None` means a full adaptive palette
    pub fn max_colors(self) -> Option<u32> {
        match self {
            Quality::Low => Some(64),
            Quality::Medium => Some(128),
            Quality::High => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            other => Err(format!(
                "unknown quality '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

/// Caller-supplied options for one encode call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    #[serde(default = "default_fps")]
    pub fps: u32,

    #[serde(default)]
    pub quality: Quality,

    /// Reserve a transparent palette slot and keep alpha in the output
    #[serde(default = "default_true")]
    pub transparent: bool,

    /// Loop forever instead of playing once
    #[serde(default = "default_true")]
    pub loop_forever: bool,
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

fn default_true() -> bool {
    true
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            quality: Quality::Medium,
            transparent: true,
            loop_forever: true,
        }
    }
}

impl EncodeOptions {
    /// Fixed profile used by `quick_convert`
    pub fn quick(fps: u32) -> Self {
        Self {
            fps,
            ..Self::default()
        }
    }

    /// Frame rate with a zero value replaced by the default
    pub fn effective_fps(&self) -> u32 {
        if self.fps == 0 {
            tracing::warn!(default = DEFAULT_FPS, "fps of 0 is not usable, using default");
            DEFAULT_FPS
        } else {
            self.fps
        }
    }
}

/// One encoded raster image (PNG bytes) supplied by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub bytes: Vec<u8>,
}

impl Frame {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

/// A ready-to-run encoder invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeCommand(String);

impl EncodeCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self(command.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Palette and GIF commands for one encode call, in no particular execution order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandPair {
    pub palette: EncodeCommand,
    pub gif: EncodeCommand,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncoderStatus {
    pub available: bool,
    pub path: Option<String>,
    pub version: Option<String>,
}
