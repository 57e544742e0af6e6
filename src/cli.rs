use crate::engine::core::Quality;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gifsmith")]
#[command(about = "Encode rendered frame sequences into optimized GIFs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use this ffmpeg binary instead of the configured one or PATH lookup
    #[arg(long, global = true, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check if ffmpeg is installed and usable
    CheckFfmpeg,

    /// Show encoder availability, path and version
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the palette and GIF commands without executing (dry run)
    DryRun {
        #[command(flatten)]
        io: FrameIo,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Encode a directory of PNG frames into a GIF
    Encode {
        #[command(flatten)]
        io: FrameIo,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Encode with medium quality, transparency and looping
    Quick {
        #[command(flatten)]
        io: FrameIo,

        /// Frames per second
        #[arg(long, default_value_t = 15)]
        fps: u32,
    },

    /// Show config status and location, or create default config if missing
    InitConfig,
}

#[derive(Args)]
pub struct FrameIo {
    /// Directory containing the frames as *.png, in file name order
    pub frames_dir: PathBuf,

    /// Destination GIF
    pub output: PathBuf,
}

#[derive(Args, Default)]
pub struct OptionArgs {
    /// Frames per second (config default when omitted)
    #[arg(long)]
    pub fps: Option<u32>,

    /// Palette quality: low, medium or high
    #[arg(long)]
    pub quality: Option<Quality>,

    /// Drop transparency
    #[arg(long)]
    pub opaque: bool,

    /// Play once instead of looping
    #[arg(long)]
    pub once: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
