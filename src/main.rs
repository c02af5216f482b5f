//! slate - a small terminal text editor
//!
//! This is the main entry point. It parses CLI arguments, builds the
//! configuration and hands over to the terminal event loop.

use slate::{cli, config, logging, run, user_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let cli = cli::Cli::parse()?;
    if cli.help {
        println!("{}", cli::Cli::usage());
        return Ok(());
    }

    if let Some(path) = &cli.log {
        logging::init(path)?;
    }

    // Load configuration
    let mut config = config::Config::default();
    user_config::configure(&mut config);

    // Apply CLI overrides
    cli.apply_to_config(&mut config);

    run::ensure_terminal()?;
    run::run_terminal_mode(&cli.files, &config)?;

    Ok(())
}
