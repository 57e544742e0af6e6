// Host-side bridge: real filesystem and process spawning via tokio

use super::bridge::{BridgeError, CommandOutput, DesktopBridge, EncoderAvailability, FrameFile};
use super::core::write_debug_log;
use crate::config::Config;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use uuid::Uuid;

const ENCODER_PROGRAM: &str = "ffmpeg";
const TEMP_DIR_PREFIX: &str = "gifsmith_";

#[derive(Debug, Clone)]
pub struct LocalBridge {
    encoder_override: Option<PathBuf>,
    temp_root: PathBuf,
    debug_log: bool,
}

impl Default for LocalBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalBridge {
    pub fn new() -> Self {
        Self {
            encoder_override: None,
            temp_root: std::env::temp_dir(),
            debug_log: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            encoder_override: config.encoder.path.clone(),
            debug_log: config.logging.debug_log,
            ..Self::new()
        }
    }

    pub fn with_encoder_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.encoder_override = Some(path.into());
        self
    }

    /// Directory under which workspaces are created (defaults to the OS temp dir)
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    fn log(&self, message: &str) {
        if self.debug_log {
            let _ = write_debug_log(message);
        }
    }
}

/// Locate `program` in PATH
pub fn find_on_path(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    let file_name = if cfg!(windows) {
        format!("{}.exe", program)
    } else {
        program.to_string()
    };
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}

#[async_trait]
impl DesktopBridge for LocalBridge {
    async fn check_encoder_availability(&self) -> Result<EncoderAvailability, BridgeError> {
        let candidate = match &self.encoder_override {
            Some(path) => path.clone(),
            None => match find_on_path(ENCODER_PROGRAM) {
                Some(path) => path,
                None => {
                    return Ok(EncoderAvailability {
                        is_available: false,
                        path: None,
                        error: Some("ffmpeg was not found on PATH".to_string()),
                    });
                }
            },
        };

        let path = candidate.to_string_lossy().to_string();
        let output = Command::new(&candidate)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await;

        let availability = match output {
            Ok(out) if out.status.success() => EncoderAvailability {
                is_available: true,
                path: Some(path),
                error: None,
            },
            Ok(out) => EncoderAvailability {
                is_available: false,
                path: Some(path),
                error: Some(format!("ffmpeg -version failed with status: {}", out.status)),
            },
            Err(e) => EncoderAvailability {
                is_available: false,
                path: Some(path),
                error: Some(format!("Failed to execute ffmpeg: {}", e)),
            },
        };
        Ok(availability)
    }

    async fn create_temp_directory(&self) -> Result<PathBuf, BridgeError> {
        let dir = self
            .temp_root
            .join(format!("{}{}", TEMP_DIR_PREFIX, Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| BridgeError::io("create temp directory", e))?;
        Ok(dir)
    }

    async fn persist_frames(
        &self,
        dir: &Path,
        frames: &[FrameFile<'_>],
    ) -> Result<(), BridgeError> {
        for frame in frames {
            tokio::fs::write(dir.join(frame.name), frame.bytes)
                .await
                .map_err(|e| BridgeError::FrameWrite {
                    index: frame.index,
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    async fn run_command(&self, command: &str) -> Result<CommandOutput, BridgeError> {
        let argv = shlex::split(command)
            .ok_or_else(|| BridgeError::Process(format!("unparseable command line: {}", command)))?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| BridgeError::Process("empty command line".to_string()))?;

        self.log(&format!("\n=== Encoder Command ===\n{}\n", command));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                self.log(&format!("✗ Failed to spawn {}: {}\n", program, e));
                BridgeError::Process(format!("{}: {}", program, e))
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
        };

        if result.success() {
            self.log("✓ Success\n");
        } else {
            self.log(&format!(
                "✗ Exit status: {}\nstderr:\n{}\n",
                output.status, result.stderr
            ));
        }
        Ok(result)
    }

    async fn count_files(&self, dir: &Path, extension: &str) -> Result<usize, BridgeError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| BridgeError::io("list directory", e))?;
        let mut count = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| BridgeError::io("list directory", e))?
        {
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if !matches {
                continue;
            }
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| BridgeError::io("list directory", e))?;
            if file_type.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn remove_directory(&self, dir: &Path) -> Result<(), BridgeError> {
        tokio::fs::remove_dir_all(dir)
            .await
            .map_err(|e| BridgeError::io("remove directory", e))
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, BridgeError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| BridgeError::io("read file", e))
    }
}
