//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Fhirflow configuration file.

use crate::config::{load_config, redact_connection_string};
use crate::domain::Entity;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Queue Capacity: {}", config.pipeline.queue_capacity);
        println!("  Workers: {}", config.pipeline.worker_count);
        println!("  Flush Interval: {}ms", config.pipeline.flush_interval_ms);
        println!("  Cache TTL: {}s", config.pipeline.cache_ttl_seconds);
        for entity in Entity::INGEST_ORDER {
            println!("  Source ({entity}): {}", config.sources.url_for(entity));
        }
        println!(
            "  PostgreSQL Connection: {}",
            redact_connection_string(config.postgresql.connection_string.expose_secret().as_ref())
        );
        println!(
            "  Pool Size: {}..={}",
            config.postgresql.min_connections, config.postgresql.max_connections
        );
        println!(
            "  Local Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();
        Ok(0)
    }
}
