// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! GTFS-RT bronze CLI
//!
//! Command-line interface for batch snapshot conversion

use clap::Parser;
use gtfsrt_bronze::cli::{Cli, Runner};

fn main() {
    let cli = Cli::parse();
    let runner = Runner::new(cli);

    let config = match runner.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(runner.log_level(&config).into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = runner.run(config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
