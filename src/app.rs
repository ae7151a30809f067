use crate::cli::Args;
use crate::config::RunConfig;
use crate::error::{AppError, DOWNLOADER_ERROR};
use crate::ffmpeg;
use crate::invoke;
use crate::prompt::{Prompter, TermPrompter};
use crate::resolve::{self, Resolution};
use crate::select;
use crate::util::part_of_day;
use anyhow::Context;
use chrono::{Local, Timelike};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn run(args: Args) -> Result<(), AppError> {
    let mut prompter = TermPrompter;
    run_with(args, &mut prompter)
}

fn run_with(args: Args, prompter: &mut dyn Prompter) -> Result<(), AppError> {
    ffmpeg::check_dependencies()?;
    let config = RunConfig::from_args(args, prompter)?;

    // One scratch directory per run; intermediate artifacts for every track
    // live here and the whole tree is removed on exit, early errors included.
    let scratch = tempfile::Builder::new()
        .prefix("songclip-")
        .tempdir()
        .context("could not create scratch directory")?;
    info!("scratch directory: {}", scratch.path().display());

    println!("ℹ️ fetching audio for `{}`...", config.query);
    let mut downloader_args = vec![config.query.clone()];
    downloader_args.extend(config.downloader_args.iter().cloned());
    invoke::run(
        "spotdl",
        &downloader_args,
        Some(scratch.path()),
        false,
        DOWNLOADER_ERROR,
    )?;

    let tracks = discover_tracks(scratch.path());
    if tracks.is_empty() {
        println!("ℹ️ the downloader produced no audio files, nothing to do");
        return Ok(());
    }
    info!("{} track(s) to process", tracks.len());

    if !config.use_defaults {
        println!("\nℹ️ enter timestamps in format [hh:mm:]ss");
        println!("   the end timestamp may be relative, prefix it with '+'; -1 means end of track");
        println!("   press enter to accept the shown defaults");
    }

    for source in &tracks {
        process_track(&config, source, scratch.path(), prompter)?;
    }

    scratch
        .close()
        .context("could not remove scratch directory")?;
    println!(
        "\n✅ all clips created. have a great {}.",
        part_of_day(Local::now().hour())
    );
    Ok(())
}

/// Audio files the downloader dropped into the scratch directory, in a
/// stable order.
fn discover_tracks(root: &Path) -> Vec<PathBuf> {
    let mut tracks: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ffmpeg::AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                })
        })
        .collect();
    tracks.sort();
    tracks
}

fn process_track(
    config: &RunConfig,
    source: &Path,
    scratch: &Path,
    prompter: &mut dyn Prompter,
) -> Result<(), AppError> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clip".to_string());

    let duration = ffmpeg::probe_duration(source)?;
    info!("track `{stem}`: {duration} s");

    let out_path = match &config.out_file {
        Some(path) => path.clone(),
        None => {
            let candidate = config.out_dir.join(format!("{stem}.mp4"));
            match resolve::resolve_output(candidate, config.assume_yes, prompter)? {
                Resolution::Write(path) => path,
                Resolution::Skip => {
                    println!("ℹ️ skipping `{stem}`");
                    return Ok(());
                }
            }
        }
    };

    println!("\n  {stem}");
    let range = select::select_range(config, &stem, duration, &out_path, prompter)?;

    let clip_path = scratch.join(format!("{stem}_clip.mp3"));
    ffmpeg::trim_audio(source, &clip_path, range, scratch)?;

    let cover_path = match &config.cover_image {
        Some(image) => image.clone(),
        None => {
            let cover = scratch.join(format!("{stem}_cover.png"));
            ffmpeg::extract_cover(source, &cover, scratch)?;
            cover
        }
    };

    let staged = scratch.join(format!("{stem}.mp4"));
    ffmpeg::compose_clip(
        &cover_path,
        &clip_path,
        &config.composer_args,
        range.length(),
        &staged,
    )?;

    move_into_place(&staged, &out_path)?;
    println!("✅ wrote {}", out_path.display());
    Ok(())
}

/// Finalize a staged clip. The scratch directory commonly sits on another
/// filesystem than the output directory, where `rename` cannot work.
fn move_into_place(staged: &Path, target: &Path) -> Result<(), AppError> {
    if fs::rename(staged, target).is_ok() {
        return Ok(());
    }
    fs::copy(staged, target)
        .with_context(|| format!("could not move clip to {}", target.display()))?;
    fs::remove_file(staged).context("could not remove staged clip")?;
    Ok(())
}
