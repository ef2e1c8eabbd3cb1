use std::path::PathBuf;

use clap::{Parser, Subcommand};

use clustercode::config::{AppConfig, LogFormat};

/// Priority scanning and post-transcode cleanup for clustercode workers.
#[derive(Debug, Parser)]
#[command(name = "clustercode", version, about)]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "CC_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Log level for clustercode targets (overrides config)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Console log format (overrides config)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan the input tree once and print the candidates as JSON
    Scan {
        /// Input root (overrides config)
        #[arg(long)]
        input_dir: Option<PathBuf>,
    },

    /// Run the cleanup pipeline for one finished transcode
    Cleanup {
        /// JSON file with the finished-transcode event, `-` for stdin
        #[arg(long)]
        event: PathBuf,

        /// Output root (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Replace existing output files instead of adding a timestamp
        #[arg(long)]
        overwrite: bool,
    },
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.log.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log.format = format;
        }
        match &self.command {
            Commands::Scan { input_dir } => {
                if let Some(dir) = input_dir {
                    config.scan.base_input_dir = dir.clone();
                }
            }
            Commands::Cleanup {
                output_dir,
                overwrite,
                ..
            } => {
                if let Some(dir) = output_dir {
                    config.cleanup.base_output_dir = dir.clone();
                }
                if *overwrite {
                    config.cleanup.overwrite_files = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply() {
        let args = Args::parse_from([
            "clustercode",
            "--log-format",
            "json",
            "cleanup",
            "--event",
            "-",
            "--output-dir",
            "/out",
            "--overwrite",
        ]);
        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.cleanup.base_output_dir, PathBuf::from("/out"));
        assert!(config.cleanup.overwrite_files);
    }
}
