//! Configuration module
//!
//! Settings come from environment variables (optionally a `.env` file). Every
//! value has a default so the service starts with no configuration at all.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_CSV_COLUMN, DEFAULT_QUALITY};

const SERVER_PORT: u16 = 5000;
const BIND_ADDRESS: &str = "0.0.0.0";
const DOWNLOAD_FOLDER: &str = "downloads";
const UPLOAD_FOLDER: &str = "uploads";
const DOWNLOAD_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 200;
const MAX_CONCURRENT_BATCHES: usize = 1;

/// Console log layout
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub bind_address: String,
    pub environment: String,
    /// Root under which dated download folders are created
    pub download_root: PathBuf,
    /// Root of the CSV upload-token store
    pub upload_root: PathBuf,
    pub default_quality: u8,
    pub default_csv_column: String,
    pub download_timeout_secs: u64,
    pub max_upload_size_bytes: usize,
    /// Batch requests (CSV process, image upload) allowed to run at once
    pub max_concurrent_batches: usize,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: SERVER_PORT,
            bind_address: BIND_ADDRESS.to_string(),
            environment: "development".to_string(),
            download_root: PathBuf::from(DOWNLOAD_FOLDER),
            upload_root: PathBuf::from(UPLOAD_FOLDER),
            default_quality: DEFAULT_QUALITY,
            default_csv_column: DEFAULT_CSV_COLUMN.to_string(),
            download_timeout_secs: DOWNLOAD_TIMEOUT_SECS,
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            max_concurrent_batches: MAX_CONCURRENT_BATCHES,
            log_format: LogFormat::Compact,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let server_port = match env::var("PORT") {
            Ok(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("PORT must be a valid port number: {}", e))?,
            Err(_) => SERVER_PORT,
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| BIND_ADDRESS.to_string()),
            environment,
            download_root: env::var("DOWNLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DOWNLOAD_FOLDER)),
            upload_root: env::var("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(UPLOAD_FOLDER)),
            default_quality: env::var("DEFAULT_QUALITY")
                .unwrap_or_else(|_| DEFAULT_QUALITY.to_string())
                .parse()
                .unwrap_or(DEFAULT_QUALITY),
            default_csv_column: env::var("DEFAULT_CSV_COLUMN")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| DEFAULT_CSV_COLUMN.to_string()),
            download_timeout_secs: env::var("DOWNLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| DOWNLOAD_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DOWNLOAD_TIMEOUT_SECS),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            max_concurrent_batches: env::var("MAX_CONCURRENT_BATCHES")
                .unwrap_or_else(|_| MAX_CONCURRENT_BATCHES.to_string())
                .parse()
                .unwrap_or(MAX_CONCURRENT_BATCHES),
            log_format: env::var("LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(1..=100).contains(&self.default_quality) {
            return Err(anyhow::anyhow!(
                "DEFAULT_QUALITY must be between 1 and 100, got {}",
                self.default_quality
            ));
        }

        if self.default_csv_column.is_empty() {
            return Err(anyhow::anyhow!("DEFAULT_CSV_COLUMN must not be empty"));
        }

        if self.download_timeout_secs == 0 {
            return Err(anyhow::anyhow!("DOWNLOAD_TIMEOUT_SECS must be greater than 0"));
        }

        if self.max_concurrent_batches == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_BATCHES must be greater than 0"));
        }

        if self.download_root == self.upload_root {
            return Err(anyhow::anyhow!(
                "DOWNLOAD_FOLDER and UPLOAD_FOLDER must be different directories"
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
