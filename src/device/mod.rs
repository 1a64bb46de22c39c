//! Identity of the emulated tuner
//!
//! Resolved once from configuration and shared read-only by the protocol
//! documents, the discovery JSON and SSDP advertisements.

use serde::Serialize;

use crate::config::Config;
use crate::utils::url::UrlUtils;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub friendly_name: String,
    pub manufacturer: String,
    pub manufacturer_url: String,
    pub model_number: String,
    pub firmware_name: String,
    pub firmware_version: String,
    pub device_id: String,
    pub device_auth: String,
    pub tuner_count: u32,
    /// Advertised base URL, without a trailing slash
    pub base_url: String,
}

/// Lightweight capability summary served at `/discover.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscoverResponse {
    pub friendly_name: String,
    pub manufacturer: String,
    #[serde(rename = "ManufacturerURL")]
    pub manufacturer_url: String,
    pub model_number: String,
    pub firmware_name: String,
    pub tuner_count: u32,
    pub firmware_version: String,
    #[serde(rename = "DeviceID")]
    pub device_id: String,
    pub device_auth: String,
    #[serde(rename = "BaseURL")]
    pub base_url: String,
    #[serde(rename = "LineupURL")]
    pub lineup_url: String,
}

impl DeviceIdentity {
    pub fn from_config(config: &Config) -> Self {
        let device = &config.device;
        Self {
            friendly_name: device.friendly_name.clone(),
            manufacturer: device.manufacturer.clone(),
            manufacturer_url: device.manufacturer_url.clone(),
            model_number: device.model_number.clone(),
            firmware_name: device.firmware_name.clone(),
            firmware_version: device.firmware_version.clone(),
            device_id: device.device_id.clone(),
            device_auth: device.device_auth.clone(),
            tuner_count: device.tuner_count,
            base_url: UrlUtils::trim_trailing_slash(&config.web.base_url).to_string(),
        }
    }

    pub fn lineup_url(&self) -> String {
        format!("{}/lineup.json", self.base_url)
    }

    /// SSDP `LOCATION` of the root device descriptor
    pub fn descriptor_url(&self) -> String {
        format!("{}/device.xml", self.base_url)
    }

    /// Unique device name as used in `UDN` and SSDP `USN` headers
    pub fn udn(&self) -> String {
        format!("uuid:{}", self.device_id)
    }

    pub fn discover(&self) -> DiscoverResponse {
        DiscoverResponse {
            friendly_name: self.friendly_name.clone(),
            manufacturer: self.manufacturer.clone(),
            manufacturer_url: self.manufacturer_url.clone(),
            model_number: self.model_number.clone(),
            firmware_name: self.firmware_name.clone(),
            tuner_count: self.tuner_count,
            firmware_version: self.firmware_version.clone(),
            device_id: self.device_id.clone(),
            device_auth: self.device_auth.clone(),
            base_url: self.base_url.clone(),
            lineup_url: self.lineup_url(),
        }
    }
}
