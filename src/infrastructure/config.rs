//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the JSON character store
    pub data_file: PathBuf,
    /// Optional JSON file replacing the built-in reference catalog
    pub catalog_file: Option<PathBuf>,

    /// Base URL of the public SRD rules API
    pub srd_base_url: String,
    /// Pause between consecutive SRD API requests
    pub srd_request_interval_ms: u64,
    /// Upper bound on in-flight SRD API requests
    pub srd_max_concurrency: usize,

    /// HTTP server port for `serve`
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            data_file: env::var("CHARFORGE_DATA_FILE")
                .unwrap_or_else(|_| "characters.json".to_string())
                .into(),
            catalog_file: env::var("CHARFORGE_CATALOG_FILE").ok().map(PathBuf::from),

            srd_base_url: env::var("SRD_BASE_URL")
                .unwrap_or_else(|_| "https://www.dnd5eapi.co".to_string()),
            srd_request_interval_ms: env::var("SRD_REQUEST_INTERVAL_MS")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .context("SRD_REQUEST_INTERVAL_MS must be a number of milliseconds")?,
            srd_max_concurrency: env::var("SRD_MAX_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("SRD_MAX_CONCURRENCY must be a positive number")?,

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}
