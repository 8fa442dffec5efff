// Mon Oct 19 2026 - Alex

pub mod args;
pub mod handler;

pub use args::{Args, Command, CriteriaArgs, DiffArgs, DumpArgs, SearchArgs};
pub use handler::CommandHandler;

use clap::Parser;

pub fn parse_args() -> Args {
    Args::parse()
}

pub fn run() -> anyhow::Result<()> {
    let args = parse_args();
    let handler = CommandHandler::new();
    handler.execute(args)
}
