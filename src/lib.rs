// Infrastructure layer (shared components)
pub mod config;
pub mod error;
pub mod metrics;
pub mod postgres;
pub mod telemetry;

// Domain layer (business logic)
pub mod audit;
pub mod dispatch;
pub mod i18n;
pub mod leaders;
pub mod queue;
pub mod rules;

// Application layer
pub mod api;
pub mod server;
pub mod triggers;
