//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Fhirflow using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Fhirflow - FHIR NDJSON to PostgreSQL ingestion
#[derive(Parser, Debug)]
#[command(name = "fhirflow")]
#[command(version, about, long_about = None)]
#[command(author = "Fhirflow Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "fhirflow.toml", env = "FHIRFLOW_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FHIRFLOW_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream FHIR exports into PostgreSQL
    Ingest(commands::ingest::IngestArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Entity;

    #[test]
    fn test_cli_parse_ingest() {
        let cli = Cli::parse_from(["fhirflow", "ingest"]);
        assert_eq!(cli.config, "fhirflow.toml");
        match cli.command {
            Commands::Ingest(args) => {
                assert!(args.entity.is_none());
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_ingest_single_entity() {
        let cli = Cli::parse_from(["fhirflow", "ingest", "--entity", "encounter", "--dry-run"]);
        match cli.command {
            Commands::Ingest(args) => {
                assert_eq!(args.entity, Some(Entity::Encounters));
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_entity() {
        let result = Cli::try_parse_from(["fhirflow", "ingest", "--entity", "medications"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["fhirflow", "--config", "custom.toml", "ingest"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["fhirflow", "--log-level", "debug", "ingest"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["fhirflow", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }
}
