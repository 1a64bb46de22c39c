/// Configuration default values
///
/// Central location for every default used by the configuration layer.
// Backend defaults
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
pub const DEFAULT_CHANNEL_LIMIT: u32 = 999_999;
pub const DEFAULT_STREAM_PROFILE: &str = "pass";
pub const DEFAULT_STREAM_WEIGHT: u32 = 300;
// Note: backend.url has no default

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5004;
// Note: web.base_url has no default

// Device identity defaults
pub const DEFAULT_FRIENDLY_NAME: &str = "Antennas";
pub const DEFAULT_MANUFACTURER: &str = "Silicondust";
pub const DEFAULT_MANUFACTURER_URL: &str = "https://github.com/jfarseneau/antennas";
pub const DEFAULT_MODEL_NUMBER: &str = "HDTC-2US";
pub const DEFAULT_FIRMWARE_NAME: &str = "hdhomeruntc_atsc";
pub const DEFAULT_FIRMWARE_VERSION: &str = "20150826";
pub const DEFAULT_DEVICE_ID: &str = "2f70c0d7-90a3-4429-8275-cbeeee9cd605";
pub const DEFAULT_DEVICE_AUTH: &str = "test1234";
pub const DEFAULT_TUNER_COUNT: u32 = 6;

// Guide defaults
pub const DEFAULT_GUIDE_PATH: &str = "./data/epg.xml";
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_UPDATE_CRON: &str = "0 */10 * * * *";
pub const DEFAULT_RUN_ON_STARTUP: bool = true;

// Discovery defaults
pub const DEFAULT_DISCOVERY_ENABLED: bool = true;
pub const DEFAULT_ANNOUNCE_INTERVAL: &str = "15m";
pub const DEFAULT_SERVER_STRING: &str = "Linux/3.x UPnP/1.0 Antennas/0.1";
