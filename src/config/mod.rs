mod settings;

pub use settings::{
    ApiConfig, AuditConfig, DatabaseConfig, DispatchSettings, LoggingConfig, OtelConfig, QueueConfig, RulesConfig,
    ServerConfig, Settings, ENV_PREFIX,
};
