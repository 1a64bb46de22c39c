use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::errors::{AppError, AppResult};

pub mod defaults;

use defaults::*;

/// Prefix for environment overrides, e.g. `ANTENNAS_BACKEND__URL`
pub const ENV_PREFIX: &str = "ANTENNAS_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    pub web: WebConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub guide: GuideConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String, // mandatory
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
    #[serde(default = "default_channel_limit")]
    pub channel_limit: u32,
    #[serde(default = "default_stream_profile")]
    pub stream_profile: String,
    #[serde(default = "default_stream_weight")]
    pub stream_weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub base_url: String, // mandatory, advertised as the device BaseURL
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_friendly_name")]
    pub friendly_name: String,
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    #[serde(default = "default_manufacturer_url")]
    pub manufacturer_url: String,
    #[serde(default = "default_model_number")]
    pub model_number: String,
    #[serde(default = "default_firmware_name")]
    pub firmware_name: String,
    #[serde(default = "default_firmware_version")]
    pub firmware_version: String,
    #[serde(default = "default_device_id")]
    pub device_id: String,
    #[serde(default = "default_device_auth")]
    pub device_auth: String,
    #[serde(default = "default_tuner_count")]
    pub tuner_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideConfig {
    #[serde(default = "default_guide_path")]
    pub path: PathBuf,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_update_cron")]
    pub update_cron: String,
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_discovery_enabled")]
    pub enabled: bool,
    #[serde(default = "default_announce_interval")]
    pub announce_interval: String,
    #[serde(default = "default_server_string")]
    pub server_string: String,
}

// Backend defaults
fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

fn default_channel_limit() -> u32 {
    DEFAULT_CHANNEL_LIMIT
}

fn default_stream_profile() -> String {
    DEFAULT_STREAM_PROFILE.to_string()
}

fn default_stream_weight() -> u32 {
    DEFAULT_STREAM_WEIGHT
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Device defaults
fn default_friendly_name() -> String {
    DEFAULT_FRIENDLY_NAME.to_string()
}

fn default_manufacturer() -> String {
    DEFAULT_MANUFACTURER.to_string()
}

fn default_manufacturer_url() -> String {
    DEFAULT_MANUFACTURER_URL.to_string()
}

fn default_model_number() -> String {
    DEFAULT_MODEL_NUMBER.to_string()
}

fn default_firmware_name() -> String {
    DEFAULT_FIRMWARE_NAME.to_string()
}

fn default_firmware_version() -> String {
    DEFAULT_FIRMWARE_VERSION.to_string()
}

fn default_device_id() -> String {
    DEFAULT_DEVICE_ID.to_string()
}

fn default_device_auth() -> String {
    DEFAULT_DEVICE_AUTH.to_string()
}

fn default_tuner_count() -> u32 {
    DEFAULT_TUNER_COUNT
}

// Guide defaults
fn default_guide_path() -> PathBuf {
    PathBuf::from(DEFAULT_GUIDE_PATH)
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_update_cron() -> String {
    DEFAULT_UPDATE_CRON.to_string()
}

fn default_run_on_startup() -> bool {
    DEFAULT_RUN_ON_STARTUP
}

// Discovery defaults
fn default_discovery_enabled() -> bool {
    DEFAULT_DISCOVERY_ENABLED
}

fn default_announce_interval() -> String {
    DEFAULT_ANNOUNCE_INTERVAL.to_string()
}

fn default_server_string() -> String {
    DEFAULT_SERVER_STRING.to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            friendly_name: default_friendly_name(),
            manufacturer: default_manufacturer(),
            manufacturer_url: default_manufacturer_url(),
            model_number: default_model_number(),
            firmware_name: default_firmware_name(),
            firmware_version: default_firmware_version(),
            device_id: default_device_id(),
            device_auth: default_device_auth(),
            tuner_count: default_tuner_count(),
        }
    }
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            path: default_guide_path(),
            page_size: default_page_size(),
            update_cron: default_update_cron(),
            run_on_startup: default_run_on_startup(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: default_discovery_enabled(),
            announce_interval: default_announce_interval(),
            server_string: default_server_string(),
        }
    }
}

impl BackendConfig {
    /// Parsed per-request timeout
    pub fn request_timeout(&self) -> AppResult<Duration> {
        humantime::parse_duration(&self.request_timeout).map_err(|e| {
            AppError::configuration(format!(
                "backend.request_timeout '{}' is not a valid duration: {e}",
                self.request_timeout
            ))
        })
    }
}

impl DiscoveryConfig {
    pub fn announce_interval(&self) -> AppResult<Duration> {
        humantime::parse_duration(&self.announce_interval).map_err(|e| {
            AppError::configuration(format!(
                "discovery.announce_interval '{}' is not a valid duration: {e}",
                self.announce_interval
            ))
        })
    }
}

impl Config {
    /// Load configuration from a TOML file with `ANTENNAS_` environment overrides.
    ///
    /// Unlike a first-run service, a missing file is fatal: the operator must
    /// point the device at a backend before anything can be served.
    pub fn load_from_file(config_file: impl AsRef<Path>) -> AppResult<Self> {
        let path = config_file.as_ref();
        if !path.exists() {
            return Err(AppError::configuration(format!(
                "config file '{}' not found",
                path.display()
            )));
        }

        let config: Config = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| AppError::configuration(e.to_string()))?;

        config.validate()?;
        info!("Configuration loaded from: {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a TOML string, without environment overrides
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| AppError::configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the rest of the service cannot run with
    pub fn validate(&self) -> AppResult<()> {
        url::Url::parse(&self.backend.url).map_err(|e| {
            AppError::configuration(format!("backend.url '{}' is invalid: {e}", self.backend.url))
        })?;
        url::Url::parse(&self.web.base_url).map_err(|e| {
            AppError::configuration(format!("web.base_url '{}' is invalid: {e}", self.web.base_url))
        })?;
        self.backend.request_timeout()?;
        self.discovery.announce_interval()?;

        uuid::Uuid::parse_str(&self.device.device_id).map_err(|e| {
            AppError::configuration(format!(
                "device.device_id '{}' is not a UUID: {e}",
                self.device.device_id
            ))
        })?;
        if self.device.tuner_count == 0 {
            return Err(AppError::configuration("device.tuner_count must be at least 1"));
        }
        if self.guide.page_size == 0 {
            return Err(AppError::configuration("guide.page_size must be at least 1"));
        }
        cron::Schedule::from_str(&self.guide.update_cron).map_err(|e| {
            AppError::configuration(format!(
                "guide.update_cron '{}' is invalid: {e}",
                self.guide.update_cron
            ))
        })?;

        Ok(())
    }
}
