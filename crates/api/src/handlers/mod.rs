//! Request handlers, grouped by resource.

pub mod lipsync;
pub mod webhooks;
