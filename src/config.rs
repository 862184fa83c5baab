use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// MDBList API key
    pub mdblist_api_key: String,

    /// MDBList API base URL
    #[serde(default = "default_mdblist_api_url")]
    pub mdblist_api_url: String,

    /// Gemini API key (primary analysis engine)
    pub gemini_api_key: String,

    /// Gemini API base URL
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Poe API key (fallback analysis engine)
    pub poe_api_key: String,

    /// Poe API base URL
    #[serde(default = "default_poe_api_url")]
    pub poe_api_url: String,

    #[serde(default = "default_poe_model")]
    pub poe_model: String,

    /// Transport timeout shared by every outbound request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_mdblist_api_url() -> String {
    "https://api.mdblist.com".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_poe_api_url() -> String {
    "https://api.poe.com".to_string()
}

fn default_poe_model() -> String {
    "GPT-5-nano".to_string()
}

fn default_http_timeout_secs() -> u64 {
    60
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
