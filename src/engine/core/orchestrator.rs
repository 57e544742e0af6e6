//! Two-pass palette encode.
//!
//! `Idle -> PaletteGenerating -> GifGenerating -> Done`, with `Failed` reachable from
//! either running stage. The GIF command consumes the palette artifact, so it is only
//! issued after the palette command reported success. No retries.

use super::classify::{classify, classify_exit};
use super::error::{EncodeError, EncodeResult, ErrorKind};
use super::types::{CommandPair, EncodeCommand};
use crate::engine::bridge::DesktopBridge;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodeStage {
    Idle,
    PaletteGenerating,
    GifGenerating,
    Done,
    Failed,
}

impl EncodeStage {
    fn label(self) -> &'static str {
        match self {
            EncodeStage::Idle => "idle",
            EncodeStage::PaletteGenerating => "palette generation",
            EncodeStage::GifGenerating => "GIF generation",
            EncodeStage::Done => "done",
            EncodeStage::Failed => "failed",
        }
    }

    fn can_advance_to(self, next: EncodeStage) -> bool {
        matches!(
            (self, next),
            (EncodeStage::Idle, EncodeStage::PaletteGenerating)
                | (EncodeStage::PaletteGenerating, EncodeStage::GifGenerating)
                | (EncodeStage::GifGenerating, EncodeStage::Done)
                | (EncodeStage::PaletteGenerating, EncodeStage::Failed)
                | (EncodeStage::GifGenerating, EncodeStage::Failed)
        )
    }
}

impl fmt::Display for EncodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct TwoPassOrchestrator<'a> {
    bridge: &'a dyn DesktopBridge,
    stage: EncodeStage,
    history: Vec<EncodeStage>,
}

impl<'a> TwoPassOrchestrator<'a> {
    pub fn new(bridge: &'a dyn DesktopBridge) -> Self {
        Self {
            bridge,
            stage: EncodeStage::Idle,
            history: vec![EncodeStage::Idle],
        }
    }

    pub fn stage(&self) -> EncodeStage {
        self.stage
    }

    /// Every stage visited so far, starting with `Idle`
    pub fn history(&self) -> &[EncodeStage] {
        &self.history
    }

    fn advance(&mut self, next: EncodeStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "invalid transition {:?} -> {:?}",
            self.stage,
            next
        );
        tracing::info!(from = %self.stage, to = %next, "encode stage");
        self.stage = next;
        self.history.push(next);
    }

    /// Run palette generation, then GIF generation. Single use.
    pub async fn run(&mut self, commands: &CommandPair) -> EncodeResult<()> {
        if self.stage != EncodeStage::Idle {
            return Err(EncodeError::new(
                ErrorKind::UnknownEncoderFailure,
                format!("encode pipeline already ran (stage: {})", self.stage),
            ));
        }

        self.advance(EncodeStage::PaletteGenerating);
        if let Err(e) = self.execute(&commands.palette).await {
            self.advance(EncodeStage::Failed);
            return Err(e.in_stage(EncodeStage::PaletteGenerating.label()));
        }

        self.advance(EncodeStage::GifGenerating);
        if let Err(e) = self.execute(&commands.gif).await {
            self.advance(EncodeStage::Failed);
            return Err(e.in_stage(EncodeStage::GifGenerating.label()));
        }

        self.advance(EncodeStage::Done);
        Ok(())
    }

    async fn execute(&self, command: &EncodeCommand) -> EncodeResult<()> {
        tracing::debug!(stage = %self.stage, command = %command, "running encoder");
        let output = self
            .bridge
            .run_command(command.as_str())
            .await
            .map_err(|e| classify(&e.to_string()))?;

        if output.success() {
            Ok(())
        } else {
            tracing::warn!(
                stage = %self.stage,
                exit_code = ?output.exit_code,
                "encoder reported failure"
            );
            Err(classify_exit(output.exit_code, &output.stderr))
        }
    }
}
