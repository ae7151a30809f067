mod app;
mod cli;
mod config;
mod error;
mod ffmpeg;
mod invoke;
mod prompt;
mod resolve;
mod select;
mod timestamp;
mod util;

use clap::Parser;

fn main() {
    env_logger::init();
    let args = cli::Args::parse();
    if let Err(err) = app::run(args) {
        // Diagnostics were already printed at the failure site; this is the
        // single place the process picks an exit code.
        eprintln!("❌ songclip: {err}");
        std::process::exit(err.exit_code());
    }
}
