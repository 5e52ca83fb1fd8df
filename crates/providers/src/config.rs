//! Provider configuration loaded from environment variables.
//!
//! A provider whose API key is absent (or blank) is simply not
//! constructed; the registry fails fast only when *no* provider ends up
//! configured.

/// Credentials and endpoint for the primary (Veo3-style) provider.
#[derive(Debug, Clone)]
pub struct Veo3Settings {
    pub api_key: String,
    pub base_url: String,
    /// Provider-side model identifier sent with every submission.
    pub model: String,
}

/// Credentials and endpoint for the backup (D-ID-style) provider.
#[derive(Debug, Clone)]
pub struct DidSettings {
    pub api_key: String,
    pub base_url: String,
}

/// Full provider configuration, read once at registry construction.
#[derive(Debug, Clone, Default)]
pub struct ProvidersConfig {
    pub veo3: Option<Veo3Settings>,
    pub did: Option<DidSettings>,
    /// Public base URL of this service, used to build per-provider
    /// webhook callback URLs. When unset, providers are not asked to
    /// push and status is reconciled purely by polling.
    pub public_base_url: Option<String>,
    /// Shared secret for webhook signature verification. When unset,
    /// signatures are not enforced.
    pub webhook_secret: Option<String>,
}

impl ProvidersConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var           | Default                 |
    /// |-------------------|-------------------------|
    /// | `VEO3_API_KEY`    | (unset: provider off)   |
    /// | `VEO3_BASE_URL`   | `https://api.veo3.ai`   |
    /// | `VEO3_MODEL`      | `veo3-lipsync`          |
    /// | `DID_API_KEY`     | (unset: provider off)   |
    /// | `DID_BASE_URL`    | `https://api.d-id.com`  |
    /// | `PUBLIC_BASE_URL` | (unset: poll-only)      |
    /// | `WEBHOOK_SECRET`  | (unset: no signature)   |
    pub fn from_env() -> Self {
        let veo3 = non_blank_env("VEO3_API_KEY").map(|api_key| Veo3Settings {
            api_key,
            base_url: std::env::var("VEO3_BASE_URL")
                .unwrap_or_else(|_| "https://api.veo3.ai".into()),
            model: std::env::var("VEO3_MODEL").unwrap_or_else(|_| "veo3-lipsync".into()),
        });

        let did = non_blank_env("DID_API_KEY").map(|api_key| DidSettings {
            api_key,
            base_url: std::env::var("DID_BASE_URL")
                .unwrap_or_else(|_| "https://api.d-id.com".into()),
        });

        Self {
            veo3,
            did,
            public_base_url: non_blank_env("PUBLIC_BASE_URL"),
            webhook_secret: non_blank_env("WEBHOOK_SECRET"),
        }
    }
}

/// Read an env var, treating unset and blank identically as absent.
fn non_blank_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
