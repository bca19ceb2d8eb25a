use clap::Parser;
use k3d_rct::cli::{self, Cli, Command};
use k3d_rct::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging()?;

    match &cli.command {
        Command::Generate(args) => cli::run_generate(args),
        Command::Legend(args) => cli::run_legend(args),
        Command::InitProfile { file, force } => cli::run_init_profile(file, *force),
    }
}
