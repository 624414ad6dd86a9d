use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::dispatch::DispatchConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dispatch: DispatchSettings,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchSettings {
    /// Module switch; when off every event is ignored
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Language log descriptions are rendered in
    #[serde(default = "default_language")]
    pub default_language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    /// JSON file holding the rule definitions
    #[serde(default = "default_rules_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; in-memory leader and log stores are used when unset
    pub url: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Entries kept by the in-memory bot log (no database configured)
    #[serde(default = "default_memory_log_capacity")]
    pub memory_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    /// "memory" or "redis"
    #[serde(default = "default_queue_backend")]
    pub backend: String,
    /// Pending-job cap (memory) / approximate stream length cap (redis)
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default = "default_stream_key")]
    pub stream_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_language() -> String {
    "en".to_string()
}

fn default_rules_path() -> String {
    "config/rules.json".to_string()
}

fn default_pool_size() -> u32 {
    5
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_idle_timeout() -> u32 {
    300 // 5 minutes
}

fn default_memory_log_capacity() -> usize {
    crate::audit::DEFAULT_MEMORY_LOG_CAPACITY
}

fn default_queue_backend() -> String {
    "memory".to_string()
}

fn default_max_pending() -> usize {
    10_000
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_stream_key() -> String {
    "bot:notify:jobs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "group-apply-notifier".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "APP";

/// Section and key are split on `__` so multi-word keys keep their `_`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("dispatch.enabled", true)?
            .set_default("dispatch.default_language", "en")?
            .set_default("queue.backend", "memory")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables: APP_<SECTION>__<KEY>, e.g.
            // APP_SERVER__PORT, APP_QUEUE__REDIS_URL, APP_OTEL__SAMPLING_RATIO
            .add_source(environment());

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            enabled: self.dispatch.enabled,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_language: default_language(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: default_rules_path(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool_size: default_pool_size(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            memory_capacity: default_memory_log_capacity(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            backend: default_queue_backend(),
            max_pending: default_max_pending(),
            redis_url: default_redis_url(),
            stream_key: default_stream_key(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}
