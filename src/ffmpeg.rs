use crate::error::{AppError, MEDIA_ERROR};
use crate::invoke::{self, InvokeError};
use crate::select::ClipRange;
use anyhow::Context;
use log::{debug, warn};
use regex::Regex;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;

/// ffmpeg versions this tool is exercised against.
const TESTED_FFMPEG_MAJOR_VERSION: u32 = 7;

/// Extensions the downloader is known to produce.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "aac", "opus", "ogg", "flac", "wav"];

#[derive(Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: String,
}

/// Verify ffmpeg and ffprobe launch at all before the pipeline starts.
/// The version is only logged; unlike the hard minimum some tools enforce,
/// nothing here is known to need a specific ffmpeg release.
pub fn check_dependencies() -> Result<(), InvokeError> {
    let ffmpeg = invoke::run("ffmpeg", ["-version"], None, true, MEDIA_ERROR)?;
    match parse_ffmpeg_version(&ffmpeg.stdout) {
        Some((major, minor)) => {
            debug!("found ffmpeg {major}.{minor}");
            if major != TESTED_FFMPEG_MAJOR_VERSION {
                warn!(
                    "ffmpeg {major}.{minor} is untested (tested with {TESTED_FFMPEG_MAJOR_VERSION}.x)"
                );
            }
        }
        None => warn!("could not parse the ffmpeg version banner"),
    }
    invoke::run("ffprobe", ["-version"], None, true, MEDIA_ERROR)?;
    Ok(())
}

fn parse_ffmpeg_version(banner: &str) -> Option<(u32, u32)> {
    let re = Regex::new(r"ffmpeg version (\d+)\.(\d+)").ok()?;
    let caps = re.captures(banner)?;
    Some((
        caps.get(1)?.as_str().parse().ok()?,
        caps.get(2)?.as_str().parse().ok()?,
    ))
}

/// Probe a track's duration in whole seconds (fractional part truncated).
pub fn probe_duration(source: &Path) -> Result<u64, AppError> {
    let args: Vec<&OsStr> = vec![
        "-v".as_ref(),
        "quiet".as_ref(),
        "-print_format".as_ref(),
        "json".as_ref(),
        "-show_format".as_ref(),
        source.as_os_str(),
    ];
    let result = invoke::run("ffprobe", args, None, true, MEDIA_ERROR)?;
    let probe: ProbeOutput = serde_json::from_str(&result.stdout)
        .with_context(|| format!("unusable ffprobe output for {}", source.display()))?;
    parse_whole_seconds(&probe.format.duration)
        .with_context(|| {
            format!(
                "unusable duration `{}` for {}",
                probe.format.duration,
                source.display()
            )
        })
        .map_err(AppError::Other)
}

fn parse_whole_seconds(duration: &str) -> anyhow::Result<u64> {
    let whole = duration.split('.').next().unwrap_or(duration);
    Ok(whole.parse()?)
}

/// Cut `range` out of the source into a standalone audio artifact.
pub fn trim_audio(
    source: &Path,
    clip: &Path,
    range: ClipRange,
    cwd: &Path,
) -> Result<(), AppError> {
    let start = range.start.to_string();
    let end = range.end.to_string();
    let args: Vec<&OsStr> = vec![
        "-y".as_ref(),
        "-ss".as_ref(),
        start.as_str().as_ref(),
        "-to".as_ref(),
        end.as_str().as_ref(),
        "-i".as_ref(),
        source.as_os_str(),
        clip.as_os_str(),
    ];
    invoke::run("ffmpeg", args, Some(cwd), true, MEDIA_ERROR)?;
    Ok(())
}

/// Extract the embedded album art into a still image.
pub fn extract_cover(source: &Path, cover: &Path, cwd: &Path) -> Result<(), AppError> {
    let args: Vec<&OsStr> = vec![
        "-y".as_ref(),
        "-i".as_ref(),
        source.as_os_str(),
        "-an".as_ref(),
        cover.as_os_str(),
    ];
    invoke::run("ffmpeg", args, Some(cwd), true, MEDIA_ERROR)?;
    Ok(())
}

/// Compose the final video: the cover image looped over the trimmed audio,
/// capped at the clip length.
pub fn compose_clip(
    cover: &Path,
    clip: &Path,
    composer_args: &[String],
    clip_length: u64,
    output: &Path,
) -> Result<(), AppError> {
    let length = clip_length.to_string();
    let mut args: Vec<&OsStr> = vec![
        "-y".as_ref(),
        "-i".as_ref(),
        cover.as_os_str(),
        "-i".as_ref(),
        clip.as_os_str(),
    ];
    args.extend(composer_args.iter().map(|a| OsStr::new(a.as_str())));
    args.push("-t".as_ref());
    args.push(length.as_str().as_ref());
    args.push(output.as_os_str());
    invoke::run("ffmpeg", args, None, true, MEDIA_ERROR)?;
    Ok(())
}
