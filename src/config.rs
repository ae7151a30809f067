use crate::cli::Args;
use crate::error::AppError;
use crate::prompt::Prompter;
use crate::timestamp::{EndSpec, parse_timestamp};
use std::path::PathBuf;

/// Validated run parameters. Built once from the CLI arguments and never
/// mutated afterwards; every component receives it by reference.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub query: String,
    pub out_dir: PathBuf,
    pub out_file: Option<PathBuf>,
    pub downloader_args: Vec<String>,
    pub composer_args: Vec<String>,
    pub clip_start: u64,
    pub clip_end: EndSpec,
    pub cover_image: Option<PathBuf>,
    pub use_defaults: bool,
    pub assume_yes: bool,
}

impl RunConfig {
    /// Validate the argument combination before anything downstream runs.
    /// An existing explicit output file is confirmed here, once; declining
    /// aborts the whole run.
    pub fn from_args(args: Args, prompter: &mut dyn Prompter) -> Result<Self, AppError> {
        let clip_start = parse_timestamp(&args.clip_start, None, None).ok_or_else(|| {
            AppError::Validation(format!("invalid clip start `{}`", args.clip_start))
        })?;
        let clip_end = EndSpec::parse(&args.clip_end).ok_or_else(|| {
            AppError::Validation(format!("invalid clip end `{}`", args.clip_end))
        })?;
        if let EndSpec::Absolute(end) = clip_end {
            if end <= clip_start {
                return Err(AppError::Validation(format!(
                    "clip end ({end}) must lie after clip start ({clip_start})"
                )));
            }
        }

        if !args.dir.exists() {
            return Err(AppError::Validation(format!(
                "output directory {} does not exist",
                args.dir.display()
            )));
        }
        if !args.dir.is_dir() {
            return Err(AppError::Validation(format!(
                "{} is not a directory",
                args.dir.display()
            )));
        }

        if let Some(out) = &args.out {
            if out.is_dir() {
                return Err(AppError::Validation(format!(
                    "output file {} is a directory",
                    out.display()
                )));
            }
            if out.exists() && !args.yes {
                let answer = prompter.ask(
                    &format!("ℹ️ {} exists, overwrite? [y/N] ", out.display()),
                    "",
                )?;
                if !answer.eq_ignore_ascii_case("y") {
                    return Err(AppError::OverwriteDeclined);
                }
            }
        }

        if let Some(image) = &args.image {
            if !image.is_file() {
                return Err(AppError::Validation(format!(
                    "cover image {} does not exist or is not a file",
                    image.display()
                )));
            }
        }

        Ok(Self {
            query: args.query,
            out_dir: args.dir,
            out_file: args.out,
            downloader_args: split_extra_args(&args.sdargs),
            composer_args: split_extra_args(&args.ffargs),
            clip_start,
            clip_end,
            cover_image: args.image,
            use_defaults: args.use_defaults,
            assume_yes: args.yes,
        })
    }
}

/// Extra-argument strings are split on whitespace into an argv fragment;
/// they are handed to the child as discrete arguments, never to a shell.
fn split_extra_args(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}
