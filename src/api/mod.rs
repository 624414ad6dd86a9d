mod health;
mod metrics;
mod routes;
mod rules;

pub use health::{health, stats, HealthResponse, StatsResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use rules::{list_rules, reload_rules, ReloadRulesResponse};
