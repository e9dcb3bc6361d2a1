//! Replay a recorded pointer session headlessly and print the final records.

use clap::Parser;
use decalkit_app::{ReplayError, Session, replay};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "decalkit-replay", about = "Replay a decalkit session and print the resulting elements")]
struct Cli {
    /// Session document: `{ options, elements, events }`.
    session: PathBuf,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), ReplayError> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Replaying {}", cli.session.display());

    let session = Session::load(&cli.session)?;
    let report = replay(session)?;
    log::info!(
        "Replay finished: {} elements, {} notifications, {} frames",
        report.records.len(),
        report.notifications,
        report.frames
    );

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report.records)?
    } else {
        serde_json::to_string(&report.records)?
    };
    println!("{output}");
    Ok(())
}
