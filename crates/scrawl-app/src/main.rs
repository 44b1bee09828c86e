//! `scrawl <session.json> [-o out.png]`: replay a session and export it.

use clap::Parser;
use scrawl_app::{ScriptError, Session, Shell, export_png};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "scrawl", about = "Replay a whiteboard session and export it as PNG")]
struct Cli {
    /// Session file (JSON).
    session: PathBuf,

    /// PNG to write. Defaults to the session's configured output, then to
    /// the session path with a `.png` extension.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), ScriptError> {
    let session = Session::load(&cli.session)?;
    let mut shell = Shell::new(&session)?;
    shell.replay(&session.events)?;

    let output = cli
        .output
        .or_else(|| session.config.output.clone())
        .unwrap_or_else(|| cli.session.with_extension("png"));
    export_png(shell.surface(), &output)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("scrawl: {err}");
            ExitCode::FAILURE
        }
    }
}
