use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub payment: PaymentConfig,
    pub chatbot: ChatbotConfig,
    pub booking: BookingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaymentConfig {
    /// Interval between Lightning settlement checks.
    #[serde(default = "default_poll_seconds")]
    pub lightning_poll_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatbotConfig {
    #[serde(default = "default_chat_retries")]
    pub max_retries: u32,
    #[serde(default = "default_chat_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// Grace period before a page missing its draft state redirects home.
    #[serde(default = "default_abandon_seconds")]
    pub abandon_redirect_seconds: u64,
}

fn default_api_timeout() -> u64 {
    30
}
fn default_poll_seconds() -> u64 {
    5
}
fn default_chat_retries() -> u32 {
    2
}
fn default_chat_timeout() -> u64 {
    15
}
fn default_abandon_seconds() -> u64 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "/api".to_string(),
                timeout_seconds: default_api_timeout(),
            },
            payment: PaymentConfig {
                lightning_poll_seconds: default_poll_seconds(),
            },
            chatbot: ChatbotConfig {
                max_retries: default_chat_retries(),
                timeout_seconds: default_chat_timeout(),
            },
            booking: BookingConfig {
                abandon_redirect_seconds: default_abandon_seconds(),
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file is optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `NDIAGA__API__BASE_URL=https://...`
            .add_source(config::Environment::with_prefix("NDIAGA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
