use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediagrab")]
#[command(author, version, about = "Download the best available encodings of a video and merge them into one playable file")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download everything found at a URL into a folder
    Download {
        /// Page or video URL to download from
        #[arg(required = true)]
        url: String,

        /// Destination folder for the output files (created if absent)
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,

        /// Path to the ffmpeg binary (defaults to PATH lookup)
        #[arg(long)]
        ffmpeg: Option<PathBuf>,

        /// Path to the yt-dlp binary (defaults to PATH lookup)
        #[arg(long)]
        yt_dlp: Option<PathBuf>,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Display version information
    Version,
}
