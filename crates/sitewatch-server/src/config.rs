use serde::{Deserialize, Serialize};
use sitewatch_series::TimeRange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Cadence of the merge/sort/prune + alert evaluation cycle.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    /// Series retention window kept by the buffer ("15m", "1h", "6h", "24h").
    /// API range queries can only narrow this.
    #[serde(default = "default_retention_range")]
    pub retention_range: String,
    /// A channel is reported offline once no ingest has been received for
    /// this long.
    #[serde(default = "default_liveness_timeout_secs")]
    pub liveness_timeout_secs: u64,

    #[serde(default)]
    pub camera: CameraConfig,
}

/// The camera feed is an opaque external stream; the server only hands its
/// URL through to the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default)]
    pub stream_url: Option<String>,
}

fn default_http_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_tick_secs() -> u64 {
    2
}

fn default_retention_range() -> String {
    "1h".to_string()
}

fn default_liveness_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            data_dir: default_data_dir(),
            tick_secs: default_tick_secs(),
            retention_range: default_retention_range(),
            liveness_timeout_secs: default_liveness_timeout_secs(),
            camera: CameraConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.retention()?;
        Ok(config)
    }

    pub fn retention(&self) -> anyhow::Result<TimeRange> {
        self.retention_range
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
    }
}
