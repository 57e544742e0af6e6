use anyhow::{Context, Result, bail};
use gifsmith::cli::{self, Commands, FrameIo, OptionArgs};
use gifsmith::config::Config;
use gifsmith::engine::{EncodeError, EncodeOptions, Frame, GifHandler, LocalBridge};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let config = Config::load().context("Failed to load config")?;
    let mut bridge = LocalBridge::from_config(&config);
    if let Some(path) = &cli.ffmpeg {
        bridge = bridge.with_encoder_path(path);
    }
    let handler = GifHandler::new(Arc::new(bridge));

    match cli.command {
        Commands::CheckFfmpeg => {
            let status = handler.status().await;
            if !status.available {
                let reason = handler
                    .ensure_ready()
                    .await
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown reason".to_string());
                bail!("ffmpeg is not available: {}", reason);
            }
            println!("✓ ffmpeg found: {}", status.path.unwrap_or_default());
            if let Some(version) = status.version {
                println!("  {}", version);
            }
        }
        Commands::Status { json } => {
            let status = handler.status().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Available: {}", status.available);
                println!("Path: {}", status.path.as_deref().unwrap_or("-"));
                println!("Version: {}", status.version.as_deref().unwrap_or("-"));
            }
        }
        Commands::DryRun { io, options } => {
            let options = merge_options(&config.defaults, &options);
            let commands = handler
                .preview_commands(&io.output, &options)
                .await
                .map_err(report)?;
            println!("{}\n&& \\\n{}", commands.palette, commands.gif);
        }
        Commands::Encode { io, options } => {
            let options = merge_options(&config.defaults, &options);
            let frames = load_frames(&io)?;
            println!(
                "Encoding {} frames: {} → {}",
                frames.len(),
                io.frames_dir.display(),
                io.output.display()
            );
            handler
                .convert(&frames, &io.output, &options)
                .await
                .map_err(report)?;
            println!("✓ Completed: {}", io.output.display());
        }
        Commands::Quick { io, fps } => {
            let frames = load_frames(&io)?;
            handler
                .quick_convert(&frames, &io.output, fps)
                .await
                .map_err(report)?;
            println!("✓ Completed: {}", io.output.display());
        }
        Commands::InitConfig => {
            let path = Config::config_path()?;
            if Config::exists() {
                println!("Config file exists: {}", path.display());
            } else {
                Config::ensure_default()?;
                println!("Created default config: {}", path.display());
            }
        }
    }

    Ok(())
}

fn merge_options(defaults: &EncodeOptions, args: &OptionArgs) -> EncodeOptions {
    EncodeOptions {
        fps: args.fps.unwrap_or(defaults.fps),
        quality: args.quality.unwrap_or(defaults.quality),
        transparent: defaults.transparent && !args.opaque,
        loop_forever: defaults.loop_forever && !args.once,
    }
}

fn report(err: EncodeError) -> anyhow::Error {
    match &err.detail {
        Some(detail) => anyhow::anyhow!("{}\n\nDetails:\n{}", err.display_with_hint(), detail),
        None => anyhow::anyhow!("{}", err.display_with_hint()),
    }
}

fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to read frames directory: {}", dir.display()))?;
        let is_png = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if entry.file_type().is_file() && is_png {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

fn load_frames(io: &FrameIo) -> Result<Vec<Frame>> {
    let paths = frame_paths(&io.frames_dir)?;
    if paths.is_empty() {
        bail!("No .png frames found in {}", io.frames_dir.display());
    }
    paths
        .iter()
        .map(|p| {
            std::fs::read(p)
                .map(Frame::new)
                .with_context(|| format!("Failed to read frame: {}", p.display()))
        })
        .collect()
}
