//! CLI runner - resolves configuration and drives the engine

use crate::cli::commands::{Cli, OutputFormat};
use crate::config::IngestConfig;
use crate::engine::{BatchSummary, IngestEngine};
use crate::error::Result;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load the config file (if any) and apply flag overrides
    pub fn resolve_config(&self) -> Result<IngestConfig> {
        let mut config = match &self.cli.config {
            Some(path) => {
                let config = IngestConfig::from_file(path)?;
                info!(path = %path.display(), "Loaded config file");
                config
            }
            None => IngestConfig::default(),
        };

        if let Some(dir) = &self.cli.input_dir {
            config.input_dir.clone_from(dir);
        }
        if let Some(dir) = &self.cli.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(feeds) = self.cli.feed_type {
            config.feeds = feeds;
        }
        if let Some(agency) = &self.cli.agency_filter {
            config.agency_filter = Some(agency.clone()).filter(|a| !a.is_empty());
        }
        if let Some(codec) = self.cli.compression {
            config.parquet.compression = codec;
        }
        config.inspect |= self.cli.inspect;
        config.parallel |= self.cli.parallel;

        config.validate()?;
        Ok(config)
    }

    /// Log level for the subscriber: debug with `--verbose`, else the config's
    pub fn log_level(&self, config: &IngestConfig) -> tracing::Level {
        if self.cli.verbose {
            tracing::Level::DEBUG
        } else {
            config.log_level.into()
        }
    }

    /// Run the batch and print its summary
    pub fn run(&self, config: IngestConfig) -> Result<BatchSummary> {
        let engine = IngestEngine::new(config)?;
        let summary = engine.run()?;

        if summary.has_failures() {
            warn!("Batch finished with failures; see log for details");
        }
        self.output_summary(&summary);
        Ok(summary)
    }

    /// Output the run summary
    fn output_summary(&self, summary: &BatchSummary) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(summary).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(summary).unwrap_or_default());
            }
        }
    }
}
