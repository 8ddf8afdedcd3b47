//! epg-collector: loads tuning frequencies, network maps, channel groups and
//! repeat exclusions for a programme guide collection run.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use epg_tuning::XmlElementWriter;
use log::{error, info};

mod config;
mod logging;

use config::{ConfigFile, DEFAULT_CONFIG_PATH};

/// epg-collector - programme guide collection setup
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'f', long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory where log files are stored
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Number of days to keep log files
    #[arg(long)]
    log_retention_days: Option<u64>,

    /// Log the contents of every registry after loading
    #[arg(long)]
    dump: bool,

    /// Write all provider frequencies to this XML file
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Explicit path > auto-detect > defaults
    let config_path = args.config.clone().or_else(|| {
        let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        default_path.exists().then_some(default_path)
    });
    let file_config = match &config_path {
        Some(path) => match config::load_config(path) {
            Ok(c) => {
                eprintln!("Loaded config from: {}", path.display());
                c
            }
            Err(e) => {
                eprintln!("Failed to load config file: {}", e);
                return Err(e.into());
            }
        },
        None => ConfigFile::default(),
    };

    // Command line takes precedence over the file
    let log_dir = args
        .log_dir
        .clone()
        .or_else(|| file_config.logging.log_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("logs"));
    let log_retention_days = args
        .log_retention_days
        .or(file_config.logging.retention_days)
        .unwrap_or(7);
    logging::init_logging(
        &log_dir,
        log_retention_days,
        args.verbose,
        file_config.logging.level.as_deref(),
    )?;

    info!("epg-collector starting...");
    if let Some(path) = &config_path {
        info!("  Config: {}", path.display());
    }
    info!("  Log directory: {}", log_dir.display());

    let session = file_config.build_session();
    info!(
        "Loaded {} provider(s), {} frequency(ies), {} network(s), {} channel group(s), {} repeat exclusion(s)",
        session.providers.len(),
        session.frequency_count(),
        session.network_maps.maps().len(),
        session.channel_groups.len(),
        session.repeat_exclusions.len()
    );

    if args.dump {
        session.log_diagnostics();
    }

    if let Some(path) = &args.export {
        let target = path.display().to_string();
        let file = File::create(path).map_err(|e| {
            error!("Failed to create {}: {}", target, e);
            e
        })?;

        let mut writer = XmlElementWriter::new(BufWriter::new(file), target.clone());
        writer.write_declaration()?;
        let written = session.export_frequencies(&mut writer)?;
        let mut out = writer.finish()?;
        std::io::Write::flush(&mut out)?;

        info!("Exported {} frequency(ies) to {}", written, target);
    }

    Ok(())
}
