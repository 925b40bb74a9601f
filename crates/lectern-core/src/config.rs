//! Configuration module
//!
//! This module provides configuration structures for the API and services,
//! including the metadata store, blob storage, link signing, and authentication.

use std::env;

use crate::storage_types::{CatalogBackend, StorageBackend};

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const BLOB_TIMEOUT_SECS: u64 = 30;
const PRESIGN_EXPIRY_MINUTES: u64 = 10;
/// SigV4 presigned URLs are valid for at most seven days.
const MAX_PRESIGN_EXPIRY_MINUTES: u64 = 7 * 24 * 60;
const MAX_DOCUMENT_SIZE_MB: usize = 50;

/// Console log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Base configuration shared by the HTTP layer
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Catalog service configuration
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub base: BaseConfig,
    pub catalog_backend: CatalogBackend,
    pub database_url: Option<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub blob_timeout_secs: u64,
    pub presign_expiry_minutes: u64,
    // Download gating
    pub download_requires_auth: bool,
    pub max_document_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<CatalogConfig>);

impl Config {
    fn as_catalog(&self) -> &CatalogConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment().to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        Ok(Config(Box::new(CatalogConfig::from_env()?)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_catalog().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_catalog().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_catalog().base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_catalog().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_catalog().base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_catalog().base.log_format
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_catalog().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_catalog().base.db_timeout_seconds
    }

    pub fn catalog_backend(&self) -> CatalogBackend {
        self.as_catalog().catalog_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_catalog().database_url.as_deref()
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_catalog().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_catalog().s3_bucket.as_deref()
    }

    /// S3 region, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.as_catalog()
            .s3_region
            .as_deref()
            .or(self.as_catalog().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_catalog().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_catalog().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_catalog().local_storage_base_url.as_deref()
    }

    pub fn blob_timeout_secs(&self) -> u64 {
        self.as_catalog().blob_timeout_secs
    }

    pub fn presign_expiry_minutes(&self) -> u64 {
        self.as_catalog().presign_expiry_minutes
    }

    pub fn download_requires_auth(&self) -> bool {
        self.as_catalog().download_requires_auth
    }

    pub fn max_document_size_bytes(&self) -> usize {
        self.as_catalog().max_document_size_bytes
    }
}

fn parse_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .to_lowercase()
        .parse()
        .unwrap_or(default)
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            environment,
            log_format,
        };

        let catalog_backend = match env::var("CATALOG_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => CatalogBackend::Postgres,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::S3,
        };

        let config = CatalogConfig {
            base,
            catalog_backend,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok().filter(|s| !s.trim().is_empty()),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            blob_timeout_secs: env::var("BLOB_TIMEOUT_SECS")
                .unwrap_or_else(|_| BLOB_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(BLOB_TIMEOUT_SECS)
                .max(1),
            presign_expiry_minutes: env::var("PRESIGN_EXPIRY_MINUTES")
                .unwrap_or_else(|_| PRESIGN_EXPIRY_MINUTES.to_string())
                .parse::<u64>()
                .unwrap_or(PRESIGN_EXPIRY_MINUTES)
                .max(1),
            download_requires_auth: parse_bool("DOWNLOAD_REQUIRES_AUTH", true),
            max_document_size_bytes: env::var("MAX_DOCUMENT_SIZE_MB")
                .unwrap_or_else(|_| MAX_DOCUMENT_SIZE_MB.to_string())
                .parse::<usize>()
                .unwrap_or(MAX_DOCUMENT_SIZE_MB)
                * 1024
                * 1024,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(1..=MAX_PRESIGN_EXPIRY_MINUTES).contains(&self.presign_expiry_minutes) {
            return Err(anyhow::anyhow!(
                "PRESIGN_EXPIRY_MINUTES must be between 1 and {}",
                MAX_PRESIGN_EXPIRY_MINUTES
            ));
        }

        if self.catalog_backend == CatalogBackend::Postgres {
            match self.database_url.as_deref() {
                Some(url) if url.starts_with("postgresql://") || url.starts_with("postgres://") => {}
                Some(_) => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when using the postgres catalog backend"
                    ))
                }
            }
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
