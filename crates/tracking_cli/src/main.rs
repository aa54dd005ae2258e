mod cli;
mod commands;
mod config;

use clap::Parser;
use tracking_core::CancelToken;

use crate::cli::TrackingCli;

fn main() -> anyhow::Result<()> {
    let args = TrackingCli::parse();

    // Ctrl-C stops the run between steps; nothing is written for a cancelled run.
    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel())?;
    }

    commands::run(args.cmd, &cancel)
}
