//! gradle-build-rs: runs a Gradle build and annotates compiler diagnostics.

mod cli;
mod config;
mod logging;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let summary = orchestrator::run(args).await?;

    if summary.should_fail() {
        std::process::exit(1);
    }
    Ok(())
}
