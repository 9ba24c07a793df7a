//! CLI entry point for stereogram synthesis

use clap::Parser;
use stereogrammer::io::cli::{Cli, GenerateCommand};

fn main() -> stereogrammer::Result<()> {
    let cli = Cli::parse();
    let mut command = GenerateCommand::new(cli);
    command.run()
}
