//! Caller-facing GIF export entry point.

use super::bridge::DesktopBridge;
use super::core::{
    CommandPair, EncodeError, EncodeOptions, EncodeResult, EncoderHandle, EncoderStatus, ErrorKind,
    FRAME_EXTENSION, Frame, PathStyle, TwoPassOrchestrator, Workspace, acquire, build_commands,
    classify, materialize, probe, query_version, release,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Output file name used when the GIF is returned in memory
pub const IN_MEMORY_OUTPUT_NAME: &str = "output.gif";

/// Stand-in workspace directory for dry-run command previews
pub const PREVIEW_WORKSPACE_DIR: &str = "<workspace>";

/// Encodes rendered frame sequences into GIFs through a [`DesktopBridge`].
///
/// One encode at a time per handler: concurrent `convert` calls on the same
/// handler are not coordinated here and must be serialized by the caller.
pub struct GifHandler {
    bridge: Arc<dyn DesktopBridge>,
    encoder: OnceCell<EncoderHandle>,
    path_style: PathStyle,
}

impl GifHandler {
    pub fn new(bridge: Arc<dyn DesktopBridge>) -> Self {
        Self {
            bridge,
            encoder: OnceCell::new(),
            path_style: PathStyle::native(),
        }
    }

    /// Override the host path convention used when building commands
    pub fn with_path_style(mut self, style: PathStyle) -> Self {
        self.path_style = style;
        self
    }

    /// Probe for the encoder on first use; later calls return the cached result
    pub async fn ensure_ready(&self) -> &EncoderHandle {
        self.encoder
            .get_or_init(|| probe(self.bridge.as_ref()))
            .await
    }

    /// Forget the cached probe so the next use probes again
    pub fn reinitialize(&mut self) {
        self.encoder = OnceCell::new();
    }

    async fn encoder_path(&self) -> EncodeResult<String> {
        let handle = self.ensure_ready().await;
        handle
            .usable_path()
            .map(str::to_string)
            .ok_or_else(|| EncodeError::encoder_unavailable(handle.error.as_deref()))
    }

    /// Encode `frames` into a GIF at `output_path`
    #[tracing::instrument(skip_all, fields(frames = frames.len(), output = %output_path.display()))]
    pub async fn convert(
        &self,
        frames: &[Frame],
        output_path: &Path,
        options: &EncodeOptions,
    ) -> EncodeResult<()> {
        let encoder = self.encoder_path().await?;
        let workspace = acquire(self.bridge.as_ref()).await?;

        let result = self
            .encode_in(&encoder, &workspace, frames, output_path, options)
            .await
            .map(|_| ());

        release(self.bridge.as_ref(), workspace).await;

        match &result {
            Ok(()) => tracing::info!("GIF written"),
            Err(e) => tracing::warn!(kind = %e.kind, error = %e, "GIF export failed"),
        }
        result
    }

    /// `convert` with medium quality, transparency and looping
    pub async fn quick_convert(
        &self,
        frames: &[Frame],
        output_path: &Path,
        fps: u32,
    ) -> EncodeResult<()> {
        self.convert(frames, output_path, &EncodeOptions::quick(fps))
            .await
    }

    /// Encode into the workspace and return the GIF bytes instead of leaving a file
    #[tracing::instrument(skip_all, fields(frames = frames.len()))]
    pub async fn convert_to_bytes(
        &self,
        frames: &[Frame],
        options: &EncodeOptions,
    ) -> EncodeResult<Vec<u8>> {
        let encoder = self.encoder_path().await?;
        let workspace = acquire(self.bridge.as_ref()).await?;
        let output_path = workspace.path().join(IN_MEMORY_OUTPUT_NAME);

        let result = match self
            .encode_in(&encoder, &workspace, frames, &output_path, options)
            .await
        {
            Ok(_) => self
                .bridge
                .read_file(&output_path)
                .await
                .map_err(|e| {
                    EncodeError::new(
                        ErrorKind::UnknownEncoderFailure,
                        "Failed to read encoded GIF",
                    )
                    .with_detail(e.to_string())
                }),
            Err(e) => Err(e),
        };

        release(self.bridge.as_ref(), workspace).await;
        result
    }

    /// Commands `convert` would run, against a placeholder workspace
    pub async fn preview_commands(
        &self,
        output_path: &Path,
        options: &EncodeOptions,
    ) -> EncodeResult<CommandPair> {
        let encoder = self.encoder_path().await?;
        build_commands(
            &encoder,
            Path::new(PREVIEW_WORKSPACE_DIR),
            output_path,
            options,
            self.path_style,
        )
    }

    pub async fn status(&self) -> EncoderStatus {
        let handle = self.ensure_ready().await;
        let version = match handle.usable_path() {
            Some(path) => query_version(self.bridge.as_ref(), path, self.path_style).await,
            None => None,
        };
        EncoderStatus {
            available: handle.available,
            path: handle.path.clone(),
            version,
        }
    }

    async fn encode_in(
        &self,
        encoder: &str,
        workspace: &Workspace,
        frames: &[Frame],
        output_path: &Path,
        options: &EncodeOptions,
    ) -> EncodeResult<CommandPair> {
        let bridge = self.bridge.as_ref();
        materialize(bridge, frames, workspace).await?;

        let written = bridge
            .count_files(workspace.path(), FRAME_EXTENSION)
            .await
            .map_err(|e| classify(&e.to_string()).in_stage("listing frames"))?;
        if written == 0 {
            return Err(EncodeError::empty_input());
        }
        if written < frames.len() {
            return Err(EncodeError::frame_write_failed(
                None,
                format!("only {} of {} frames were written", written, frames.len()),
            ));
        }

        let commands = build_commands(
            encoder,
            workspace.path(),
            output_path,
            options,
            self.path_style,
        )?;
        TwoPassOrchestrator::new(bridge).run(&commands).await?;
        Ok(commands)
    }
}
