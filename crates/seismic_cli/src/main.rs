//! `seismic` binary: HTTP server, reference-data seeding and a health check.

mod args;

use anyhow::{anyhow, Context, Result};
use args::{Cli, Command, PopulateArgs, ServeArgs, StorageArgs};
use clap::Parser;
use log::info;
use seismic_api::{ApiState, ServerConfig};
use seismic_core::{
    init_logging, ObservationService, SessionFactory, DEFAULT_HAZARD_TYPES, DEFAULT_STATIONS,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => serve(args),
        Command::Populate(args) => populate(args),
        Command::Ping => {
            println!("seismic_core ping={}", seismic_core::ping());
            println!("seismic_core version={}", seismic_core::core_version());
            Ok(())
        }
    }
}

fn serve(args: ServeArgs) -> Result<()> {
    let mut config = resolve_config(&args.storage)?;
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }

    let service = open_service(&config)?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(seismic_api::serve(ApiState::new(service), config.bind_addr))
        .with_context(|| format!("server on {} failed", config.bind_addr))
}

fn populate(args: PopulateArgs) -> Result<()> {
    let config = resolve_config(&args.storage)?;
    let service = open_service(&config)?;

    let stations = labels_or_default(&args.stations, DEFAULT_STATIONS);
    let hazard_types = labels_or_default(&args.hazard_types, DEFAULT_HAZARD_TYPES);
    let report = service
        .populate(&stations, &hazard_types)
        .context("failed to seed reference data")?;

    println!(
        "stations_added={} hazard_types_added={}",
        report.stations_added, report.hazard_types_added
    );

    if args.sample {
        let (station, hazard_type) = sample_labels(&stations, &hazard_types)
            .context("--sample needs at least one station and one hazard type")?;
        let sample = service
            .add_sample_observation(station, hazard_type)
            .context("failed to record sample observation")?;
        println!(
            "sample_observation_id={} station_id={} hazard_type_id={}",
            sample.id, sample.station, sample.hazard_type
        );
    }
    Ok(())
}

fn resolve_config(storage: &StorageArgs) -> Result<ServerConfig> {
    let mut config = ServerConfig::from_env()?;
    if let Some(db_path) = &storage.db_path {
        config.db_path = db_path.clone();
    }
    if let Some(level) = &storage.log_level {
        config.log_level = level.clone();
    }
    if let Some(log_dir) = &storage.log_dir {
        config.log_dir = Some(log_dir.clone());
    }

    init_logging(&config.log_level, config.log_dir.as_deref()).map_err(|err| anyhow!(err))?;
    Ok(config)
}

/// Builds the service and migrates the database up front, so a bad path
/// or schema fails before any request is served.
fn open_service(config: &ServerConfig) -> Result<ObservationService> {
    let sessions = SessionFactory::new(config.db_path.clone());
    sessions
        .open()
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    info!(
        "event=storage_ready module=cli status=ok db_path={}",
        config.db_path.display()
    );
    Ok(ObservationService::new(sessions))
}

/// First station and second hazard type, or the only hazard type when just
/// one is given.
fn sample_labels<'a>(
    stations: &[&'a str],
    hazard_types: &[&'a str],
) -> Option<(&'a str, &'a str)> {
    let station = stations.first()?;
    let hazard_type = hazard_types.get(1).or_else(|| hazard_types.first())?;
    Some((*station, *hazard_type))
}

fn labels_or_default<'a>(given: &'a [String], defaults: &'a [&'a str]) -> Vec<&'a str> {
    if given.is_empty() {
        defaults.to_vec()
    } else {
        given.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::sample_labels;

    #[test]
    fn sample_labels_pick_first_station_and_second_hazard_type() {
        let stations = ["Kurils", "Kamchatka"];
        let hazard_types = ["Safe", "Unsafe", "Danger"];

        assert_eq!(sample_labels(&stations, &hazard_types), Some(("Kurils", "Unsafe")));
        assert_eq!(sample_labels(&stations, &["Danger"]), Some(("Kurils", "Danger")));
        assert_eq!(sample_labels(&[], &hazard_types), None);
    }
}
