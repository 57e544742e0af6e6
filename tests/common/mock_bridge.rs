//! Recording test double for the desktop bridge.

use async_trait::async_trait;
use gifsmith::engine::bridge::FrameFile;
use gifsmith::engine::{BridgeError, CommandOutput, DesktopBridge, EncoderAvailability};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const MOCK_ENCODER: &str = "/usr/bin/ffmpeg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CheckAvailability,
    CreateTempDirectory,
    PersistFrames { dir: PathBuf, count: usize },
    RunCommand(String),
    CountFiles(PathBuf),
    RemoveDirectory(PathBuf),
    ReadFile(PathBuf),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    next_dir: usize,
    created: Vec<PathBuf>,
    written: HashMap<PathBuf, Vec<String>>,
    command_results: VecDeque<Result<CommandOutput, String>>,
}

#[derive(Default)]
pub struct MockBridge {
    /// `None` behaves like an unreachable bridge
    availability: Option<EncoderAvailability>,
    fail_temp_dir: bool,
    fail_frame_at: Option<usize>,
    file_count_override: Option<usize>,
    fail_remove: bool,
    output_bytes: Vec<u8>,
    state: Mutex<State>,
}

pub fn ok_output() -> CommandOutput {
    CommandOutput {
        stdout: String::new(),
        stderr: String::new(),
        exit_code: Some(0),
    }
}

pub fn failed_output(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        stdout: String::new(),
        stderr: stderr.to_string(),
        exit_code: Some(code),
    }
}

impl MockBridge {
    pub fn available() -> Self {
        Self {
            availability: Some(EncoderAvailability {
                is_available: true,
                path: Some(MOCK_ENCODER.to_string()),
                error: None,
            }),
            output_bytes: b"GIF89a".to_vec(),
            ..Self::default()
        }
    }

    pub fn unavailable(error: Option<&str>) -> Self {
        Self {
            availability: Some(EncoderAvailability {
                is_available: false,
                path: None,
                error: error.map(str::to_string),
            }),
            ..Self::default()
        }
    }

    pub fn detached() -> Self {
        Self::default()
    }

    pub fn failing_temp_dir(mut self) -> Self {
        self.fail_temp_dir = true;
        self
    }

    pub fn failing_frame_at(mut self, index: usize) -> Self {
        self.fail_frame_at = Some(index);
        self
    }

    pub fn with_file_count(mut self, count: usize) -> Self {
        self.file_count_override = Some(count);
        self
    }

    pub fn failing_cleanup(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    /// Responses for successive `run_command` calls; exhausted queue means success.
    /// `Err` simulates a process that could not be spawned.
    pub fn with_command_results(self, results: Vec<Result<CommandOutput, String>>) -> Self {
        self.state.lock().unwrap().command_results = results.into();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::RunCommand(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    /// Workspaces actually handed out; failed attempts are not counted
    pub fn created_dirs(&self) -> usize {
        self.state.lock().unwrap().created.len()
    }

    pub fn removed_dirs(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::RemoveDirectory(dir) => Some(dir),
                _ => None,
            })
            .collect()
    }

    /// File names successfully written into `dir`, in write order
    pub fn written(&self, dir: &Path) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .written
            .get(dir)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl DesktopBridge for MockBridge {
    async fn check_encoder_availability(&self) -> Result<EncoderAvailability, BridgeError> {
        self.record(Call::CheckAvailability);
        self.availability.clone().ok_or(BridgeError::Unavailable)
    }

    async fn create_temp_directory(&self) -> Result<PathBuf, BridgeError> {
        self.record(Call::CreateTempDirectory);
        if self.fail_temp_dir {
            return Err(BridgeError::io(
                "create temp directory",
                "ENOSPC: no space left on device",
            ));
        }
        let mut state = self.state.lock().unwrap();
        state.next_dir += 1;
        let dir = PathBuf::from(format!("/mock/tmp/gifsmith_{}", state.next_dir));
        state.created.push(dir.clone());
        Ok(dir)
    }

    async fn persist_frames(
        &self,
        dir: &Path,
        frames: &[FrameFile<'_>],
    ) -> Result<(), BridgeError> {
        self.record(Call::PersistFrames {
            dir: dir.to_path_buf(),
            count: frames.len(),
        });
        let mut state = self.state.lock().unwrap();
        for frame in frames {
            if self.fail_frame_at == Some(frame.index) {
                return Err(BridgeError::FrameWrite {
                    index: frame.index,
                    message: "EIO: i/o error, write".to_string(),
                });
            }
            state
                .written
                .entry(dir.to_path_buf())
                .or_default()
                .push(frame.name.to_string());
        }
        Ok(())
    }

    async fn run_command(&self, command: &str) -> Result<CommandOutput, BridgeError> {
        self.record(Call::RunCommand(command.to_string()));
        let next = self.state.lock().unwrap().command_results.pop_front();
        match next {
            None => Ok(ok_output()),
            Some(Ok(output)) => Ok(output),
            Some(Err(message)) => Err(BridgeError::Process(message)),
        }
    }

    async fn count_files(&self, dir: &Path, extension: &str) -> Result<usize, BridgeError> {
        self.record(Call::CountFiles(dir.to_path_buf()));
        if let Some(count) = self.file_count_override {
            return Ok(count);
        }
        let suffix = format!(".{}", extension);
        Ok(self
            .written(dir)
            .iter()
            .filter(|name| name.ends_with(&suffix))
            .count())
    }

    async fn remove_directory(&self, dir: &Path) -> Result<(), BridgeError> {
        self.record(Call::RemoveDirectory(dir.to_path_buf()));
        if self.fail_remove {
            return Err(BridgeError::io("remove directory", "EBUSY: resource busy"));
        }
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, BridgeError> {
        self.record(Call::ReadFile(path.to_path_buf()));
        Ok(self.output_bytes.clone())
    }
}
