//! HTTP event trigger
//!
//! The host (or a bridge listening to its event bus) posts application
//! lifecycle events together with the acting user.

mod handlers;
mod models;

pub use handlers::dispatch_event;
pub use models::DispatchEventRequest;
