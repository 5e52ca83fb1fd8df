//! Provider orchestration layer for lip-sync video generation.
//!
//! Each external video-generation service gets one [`client::ProviderClient`]
//! implementation that translates the normalized request/status shapes to
//! and from that service's wire format. The [`registry::ProviderRegistry`]
//! owns the configured clients in fixed priority order and hides provider
//! plurality from the rest of the system: callers submit through it, query
//! status through it, and never learn a provider's wire format.

pub mod client;
pub mod config;
pub mod did;
pub mod error;
pub mod registry;
pub mod veo3;

pub use client::{ProviderClient, ProviderId, WebhookEvent};
pub use error::{ProviderAttempt, ProviderError};
pub use registry::{ProviderRegistry, Submission};
