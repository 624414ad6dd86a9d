//! Entry points that feed application events into the pipeline.

pub mod http;

pub use http::{dispatch_event, DispatchEventRequest};
