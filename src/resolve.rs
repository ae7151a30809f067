use crate::prompt::Prompter;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of output-path resolution for one track. `Skip` abandons the
/// track only; the run continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Write(PathBuf),
    Skip,
}

/// Decide where one track's clip ends up. A fresh candidate path (or
/// auto-confirm) is used as-is; an existing one asks whether to overwrite,
/// skip the track, or pick a new name. Renaming re-prompts until a
/// non-existing path is named.
pub fn resolve_output(
    candidate: PathBuf,
    assume_yes: bool,
    prompter: &mut dyn Prompter,
) -> io::Result<Resolution> {
    if assume_yes || !candidate.exists() {
        return Ok(Resolution::Write(candidate));
    }

    loop {
        let answer = prompter.ask(
            &format!(
                "ℹ️ {} exists: [o]verwrite, [s]kip, [r]ename? ",
                candidate.display()
            ),
            "",
        )?;
        match answer.to_ascii_lowercase().as_str() {
            "o" | "overwrite" => return Ok(Resolution::Write(candidate)),
            "s" | "skip" => return Ok(Resolution::Skip),
            "r" | "rename" => return Ok(Resolution::Write(ask_new_name(&candidate, prompter)?)),
            _ => println!("   please answer o, s or r"),
        }
    }
}

fn ask_new_name(candidate: &Path, prompter: &mut dyn Prompter) -> io::Result<PathBuf> {
    loop {
        let name = prompter.ask("   new filename: ", "")?;
        if name.is_empty() {
            continue;
        }
        let path = match candidate.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(&name),
            _ => PathBuf::from(&name),
        };
        if path.exists() {
            println!("   {} also exists", path.display());
        } else {
            return Ok(path);
        }
    }
}
