mod cli;

use std::io::Read;
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};

use clustercode::cleanup::CleanupService;
use clustercode::config::AppConfig;
use clustercode::domain::TranscodeFinishedEvent;
use clustercode::fs::{FileSystem, OsFileSystem};
use clustercode::logging;
use clustercode::scan::{PriorityScanner, ScanReport, ScanService};
use clustercode::utils::clock::SystemClock;

use crate::cli::{Args, Commands};

/// Printed after a cleanup run; `output_path` is null when no stage set it.
#[derive(Serialize)]
struct CleanupReport<'a> {
    output_path: Option<&'a Path>,
}

fn main() {
    if let Err(e) = run() {
        error!("Application error: {:#}", e);
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply_to(&mut config);
    config.normalize();
    config.validate()?;

    let _guard = logging::init_logging(&config.log)?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting clustercode");

    let fs: Arc<dyn FileSystem> = Arc::new(OsFileSystem::new());

    match args.command {
        Commands::Scan { .. } => {
            let scanner = PriorityScanner::new(fs, config.scan.clone());
            let candidates = scanner.retrieve_files()?;
            let report = ScanReport::from(&candidates);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Cleanup { event, .. } => {
            let event = read_event(&event)?;
            let service = CleanupService::from_config(
                fs,
                Arc::new(SystemClock),
                &config.scan,
                &config.cleanup,
            )?;
            let context = service.process(event)?;
            let report = CleanupReport {
                output_path: context.output_path(),
            };
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    Ok(())
}

fn read_event(path: &Path) -> anyhow::Result<TranscodeFinishedEvent> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display()))?
    };
    serde_json::from_str(&content).context("Invalid finished-transcode event")
}
