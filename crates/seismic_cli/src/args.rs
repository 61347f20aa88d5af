//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Seismic activity observation service.
#[derive(Debug, Clone, Parser)]
#[command(name = "seismic", version, about = "Seismic activity observation service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Seed stations and hazard types; existing labels are kept
    Populate(PopulateArgs),
    /// Print core health and version
    Ping,
}

/// Options shared by commands that touch the database.
#[derive(Debug, Clone, Args)]
pub struct StorageArgs {
    /// SQLite database file (overrides SEISMIC_DB_PATH)
    #[arg(long = "db", value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides SEISMIC_LOG_LEVEL)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (overrides SEISMIC_LOG_DIR)
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Listen address (overrides SEISMIC_BIND_ADDR)
    #[arg(long = "bind", value_name = "ADDR")]
    pub bind_addr: Option<SocketAddr>,

    #[command(flatten)]
    pub storage: StorageArgs,
}

#[derive(Debug, Clone, Args)]
pub struct PopulateArgs {
    /// Station name to seed; repeatable. Defaults to the built-in set.
    #[arg(long = "station", value_name = "NAME")]
    pub stations: Vec<String>,

    /// Hazard type label to seed; repeatable. Defaults to the built-in set.
    #[arg(long = "hazard-type", value_name = "LABEL")]
    pub hazard_types: Vec<String>,

    /// Also record one sample reading for the first station and the second
    /// hazard type
    #[arg(long)]
    pub sample: bool,

    #[command(flatten)]
    pub storage: StorageArgs,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn serve_accepts_bind_and_db() {
        let cli = Cli::try_parse_from([
            "seismic",
            "serve",
            "--bind",
            "127.0.0.1:8080",
            "--db",
            "/tmp/seismic.sqlite3",
        ])
        .unwrap();

        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.bind_addr.unwrap().port(), 8080);
        assert_eq!(
            args.storage.db_path.unwrap().to_str().unwrap(),
            "/tmp/seismic.sqlite3"
        );
    }

    #[test]
    fn populate_collects_repeated_labels() {
        let cli = Cli::try_parse_from([
            "seismic",
            "populate",
            "--station",
            "Kurils",
            "--station",
            "Kavkaz",
            "--hazard-type",
            "Danger",
        ])
        .unwrap();

        let Command::Populate(args) = cli.command else {
            panic!("expected populate command");
        };
        assert_eq!(args.stations, vec!["Kurils", "Kavkaz"]);
        assert_eq!(args.hazard_types, vec!["Danger"]);
        assert!(!args.sample);
    }

    #[test]
    fn populate_accepts_sample_flag() {
        let cli = Cli::try_parse_from(["seismic", "populate", "--sample"]).unwrap();

        let Command::Populate(args) = cli.command else {
            panic!("expected populate command");
        };
        assert!(args.sample);
        assert!(args.stations.is_empty());
    }

    #[test]
    fn invalid_bind_is_rejected() {
        assert!(Cli::try_parse_from(["seismic", "serve", "--bind", "nowhere"]).is_err());
    }
}
