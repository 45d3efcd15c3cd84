use clap::Parser;

mod commands;
mod progress;

use commands::Commands;

#[derive(Parser)]
#[command(name = "chamberpak")]
#[command(about = "Portal 2 puzzle-maker content package tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    cli.command.execute()?;

    Ok(())
}
