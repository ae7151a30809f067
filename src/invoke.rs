use log::debug;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Captured output of a successful external invocation. Empty strings in
/// streaming mode, where the child inherits the terminal directly.
#[derive(Debug)]
pub struct Invocation {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("could not launch `{program}`: {source}")]
    Launch {
        program: String,
        code: i32,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with status {code}")]
    Exited { program: String, code: i32 },
}

impl InvokeError {
    /// Exit code the process should terminate with for this failure:
    /// the caller-supplied code for launch failures, the child's own
    /// code when it ran and failed.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Launch { code, .. } | Self::Exited { code, .. } => *code,
        }
    }
}

/// Run an external program with a structured argument list, never through a
/// shell. `capture` pipes stdout/stderr and returns them; otherwise the
/// child inherits the terminal. `failure_code` is the exit code reported
/// for launch failures (and for signal deaths, which carry no code).
pub fn run<I, S>(
    program: &str,
    args: I,
    cwd: Option<&Path>,
    capture: bool,
    failure_code: i32,
) -> Result<Invocation, InvokeError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let argv: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
    debug!("invoking {} {:?} (cwd: {:?})", program, argv, cwd);

    let mut command = Command::new(program);
    command.args(&argv);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = if capture {
        command.output()
    } else {
        command
            .status()
            .map(|status| std::process::Output {
                status,
                stdout: Vec::new(),
                stderr: Vec::new(),
            })
    };

    let output = output.map_err(|source| InvokeError::Launch {
        program: program.to_string(),
        code: failure_code,
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let code = output.status.code().unwrap_or(failure_code);
        if !stdout.trim().is_empty() {
            eprintln!("ℹ️ `{program}` stdout:\n{stdout}");
        }
        if !stderr.trim().is_empty() {
            eprintln!("ℹ️ `{program}` stderr:\n{stderr}");
        }
        eprintln!(
            "❌ invocation failed ({code}):\n  program: {program}\n  args: {argv:?}\n  cwd: {}",
            cwd.map_or_else(|| PathBuf::from("."), Path::to_path_buf)
                .display()
        );
        return Err(InvokeError::Exited {
            program: program.to_string(),
            code,
        });
    }

    Ok(Invocation { stdout, stderr })
}
