use anyhow::Result;
use clap::Parser;
use keymap::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    // CLI --log-level takes precedence over DEBUG_LEVEL
    keymap::debug::init_log_bridge(cli.log_level);

    log::info!("Starting keymap {}", keymap::VERSION);

    let result = cli::run(cli);
    if let Err(ref e) = result {
        eprintln!("keymap: error: {e:#}");
    }
    result
}
