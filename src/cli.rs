use clap::Parser;
use std::path::PathBuf;

/// ffmpeg arguments for looping a still cover over the trimmed audio.
pub const DEFAULT_FFARGS: &str = "-loop 1 -c:a aac -vcodec libx264 -pix_fmt yuv420p \
                                  -preset ultrafast -tune stillimage -shortest";

/// Share a song from Spotify/YouTube as a short album-art video clip
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Song name or Spotify/YouTube link
    pub query: String,

    /// Directory to write finished clips to
    #[arg(short = 'd', long, default_value = ".")]
    pub dir: PathBuf,

    /// Output file path; overrides --dir
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Extra arguments passed to the downloader (whitespace-split)
    #[arg(
        long = "sdargs",
        default_value = "",
        value_name = "ARGS",
        allow_hyphen_values = true
    )]
    pub sdargs: String,

    /// Arguments passed to ffmpeg for clip composition (whitespace-split)
    #[arg(
        long = "ffargs",
        default_value = DEFAULT_FFARGS,
        value_name = "ARGS",
        allow_hyphen_values = true
    )]
    pub ffargs: String,

    /// Default clip start timestamp, [hh:mm:]ss
    #[arg(
        short = 's',
        long = "clip-start",
        default_value = "0",
        value_name = "TIMESTAMP"
    )]
    pub clip_start: String,

    /// Default clip end timestamp; prefix with + for relative to start, -1 for end of track
    #[arg(
        short = 'e',
        long = "clip-end",
        default_value = "+15",
        value_name = "TIMESTAMP",
        allow_hyphen_values = true
    )]
    pub clip_end: String,

    /// Use this image as the clip cover instead of the embedded album art
    #[arg(short = 'i', long)]
    pub image: Option<PathBuf>,

    /// Use the configured clip range without prompting
    #[arg(short = 'u', long = "use-defaults")]
    pub use_defaults: bool,

    /// Automatically confirm clip-range and overwrite prompts
    #[arg(short = 'y', long)]
    pub yes: bool,
}
