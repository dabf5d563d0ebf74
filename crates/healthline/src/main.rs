//! healthline - host health summary for login banners
//!
//! Prints one section per configured source (systemd units, CPU
//! temperature), each with an aggregate status header.

use anyhow::Result;
use clap::Parser;
use healthline::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    healthline::app::run(cli).await
}
