use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::storage::StorageConfig;
use crate::store::StoreConfig;

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    ///
    /// Environment variables use the `COMMENTD` prefix and `__` between
    /// nested keys, e.g. `COMMENTD_SERVER__PORT=8080`.
    pub fn load() -> Result<Self> {
        let config_path =
            env::var("COMMENTD_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("COMMENTD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        config.server.validate()?;

        Ok(config)
    }

    /// Resolve the comment store configuration.
    pub fn store_config(&self) -> Result<StoreConfig> {
        self.store.to_runtime()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Mount point of the comments router
    pub base_path: String,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.base_path.starts_with('/') {
            bail!("server.base_path must start with '/'");
        }
        if self.base_path.len() > 1 && self.base_path.ends_with('/') {
            bail!("server.base_path must not end with '/'");
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            base_path: "/api/comments".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub backend: StoreBackendKind,
    pub collection: String,
    pub local: Option<LocalStoreSection>,
    pub s3: Option<S3StoreSection>,
}

impl StoreSection {
    pub fn to_runtime(&self) -> Result<StoreConfig> {
        let collection = self.collection.trim();
        if collection.is_empty() {
            bail!("store.collection must not be empty");
        }
        if collection.contains('/') {
            bail!("store.collection must not contain '/'");
        }
        let collection = collection.to_string();

        match self.backend {
            StoreBackendKind::Memory => Ok(StoreConfig::Memory),
            StoreBackendKind::Local => {
                let local = self.local.clone().unwrap_or_default();

                Ok(StoreConfig::Object {
                    storage: StorageConfig::Local {
                        root_path: local.root_path,
                    },
                    collection,
                })
            }
            StoreBackendKind::S3 => {
                let s3 = self
                    .s3
                    .clone()
                    .context("store.s3 configuration required when backend is 's3'")?;

                if s3.bucket.trim().is_empty() {
                    bail!("store.s3.bucket must be specified");
                }
                if s3.region.trim().is_empty() {
                    bail!("store.s3.region must be specified");
                }

                Ok(StoreConfig::Object {
                    storage: StorageConfig::S3 {
                        bucket: s3.bucket,
                        region: s3.region,
                        endpoint: s3.endpoint,
                        prefix: s3.prefix.and_then(|p| {
                            let trimmed = p.trim();
                            if trimmed.is_empty() {
                                None
                            } else {
                                Some(trimmed.to_string())
                            }
                        }),
                    },
                    collection,
                })
            }
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: StoreBackendKind::Local,
            collection: "comments".to_string(),
            local: Some(LocalStoreSection::default()),
            s3: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    Memory,
    #[default]
    Local,
    S3,
}

impl StoreBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackendKind::Memory => "memory",
            StoreBackendKind::Local => "local",
            StoreBackendKind::S3 => "s3",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocalStoreSection {
    pub root_path: String,
}

impl Default for LocalStoreSection {
    fn default() -> Self {
        Self {
            root_path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct S3StoreSection {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}
