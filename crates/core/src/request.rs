//! Normalized lip-sync generation request types and validation.
//!
//! Every provider client consumes the same [`GenerationRequest`] shape
//! and serializes it to its own wire format. Cross-field rules that no
//! single `#[validate]` attribute can express live in
//! [`GenerationRequest::validate_semantics`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Character cap for provider-native speech synthesis prompts (the
/// primary provider rejects longer prompts server-side).
pub const MAX_AUDIO_PROMPT_CHARS: usize = 600;

/// Hard ceiling on requested clip duration in seconds.
pub const MAX_DURATION_SECS: u32 = 600;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which kind of primary visual asset the request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Image,
    Video,
}

impl SourceKind {
    /// Stable string form, used for the `source_kind` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Output quality tier. Each provider maps these onto its own supported
/// resolutions (total mapping, nearest higher tier when no exact match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Low,
    Medium,
    High,
    Ultra,
}

impl QualityTier {
    /// Stable string form, used for the `quality_tier` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Ultra => "ultra",
        }
    }
}

// ---------------------------------------------------------------------------
// Feature flags
// ---------------------------------------------------------------------------

/// Optional generation features. Each enabled flag adds a fixed credit
/// surcharge (see [`crate::pricing`]) and is forwarded to providers that
/// understand it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Studio-quality audio post-processing.
    pub enhanced_audio: bool,
    /// Cinematic camera movement.
    pub cinematic_camera: bool,
    /// Dynamic relighting of the source asset.
    pub dynamic_lighting: bool,
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A normalized lip-sync generation request.
///
/// Exactly one visual asset is referenced by `source_url`, interpreted
/// per `source_kind`. At least one of `audio_url` / `audio_prompt` must
/// be present; a given provider declares via its capability gate which
/// combinations it accepts.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub source_kind: SourceKind,

    /// Fetchable URL of the primary visual asset.
    #[validate(url(message = "source_url must be a valid URL"))]
    pub source_url: String,

    /// Pre-recorded audio to sync to.
    #[validate(url(message = "audio_url must be a valid URL"))]
    pub audio_url: Option<String>,

    /// Text for provider-native speech synthesis.
    #[validate(length(max = 600, message = "audio_prompt exceeds the 600 character cap"))]
    pub audio_prompt: Option<String>,

    pub quality_tier: QualityTier,

    /// Requested clip duration in seconds.
    #[validate(range(min = 1, max = 600, message = "duration_secs must be 1-600"))]
    pub duration_secs: u32,

    #[serde(default)]
    pub options: GenerationOptions,
}

impl GenerationRequest {
    /// Cross-field rules on top of the derive-level checks:
    ///
    /// - at least one of `audio_url` / `audio_prompt` is present;
    /// - present fields are non-blank (a whitespace-only prompt is as
    ///   useless to a provider as an absent one).
    pub fn validate_semantics(&self) -> Result<(), CoreError> {
        if self.source_url.trim().is_empty() {
            return Err(CoreError::Validation(
                "source_url must not be empty".to_string(),
            ));
        }

        let has_audio_url = self
            .audio_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty());
        let has_audio_prompt = self
            .audio_prompt
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());

        if !has_audio_url && !has_audio_prompt {
            return Err(CoreError::Validation(
                "At least one of audio_url or audio_prompt is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether the request carries a usable pre-recorded audio track.
    pub fn has_audio_url(&self) -> bool {
        self.audio_url
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty())
    }

    /// Whether the request carries a usable speech-synthesis prompt.
    pub fn has_audio_prompt(&self) -> bool {
        self.audio_prompt
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            source_kind: SourceKind::Image,
            source_url: "https://cdn.example.com/face.jpg".to_string(),
            audio_url: Some("https://cdn.example.com/voice.mp3".to_string()),
            audio_prompt: None,
            quality_tier: QualityTier::Medium,
            duration_secs: 10,
            options: GenerationOptions::default(),
        }
    }

    #[test]
    fn valid_request_passes() {
        let req = request();
        assert!(req.validate().is_ok());
        assert!(req.validate_semantics().is_ok());
    }

    #[test]
    fn prompt_only_request_passes() {
        let req = GenerationRequest {
            audio_url: None,
            audio_prompt: Some("Hello world".to_string()),
            ..request()
        };
        assert!(req.validate_semantics().is_ok());
        assert!(req.has_audio_prompt());
        assert!(!req.has_audio_url());
    }

    #[test]
    fn missing_audio_rejected() {
        let req = GenerationRequest {
            audio_url: None,
            audio_prompt: None,
            ..request()
        };
        assert!(req.validate_semantics().is_err());
    }

    #[test]
    fn blank_audio_fields_rejected() {
        let req = GenerationRequest {
            audio_url: Some("   ".to_string()),
            audio_prompt: Some("".to_string()),
            ..request()
        };
        assert!(req.validate_semantics().is_err());
    }

    #[test]
    fn overlong_prompt_rejected() {
        let req = GenerationRequest {
            audio_url: None,
            audio_prompt: Some("x".repeat(MAX_AUDIO_PROMPT_CHARS + 1)),
            ..request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn tier_ordering_matches_pricing_ladder() {
        assert!(QualityTier::Low < QualityTier::Medium);
        assert!(QualityTier::Medium < QualityTier::High);
        assert!(QualityTier::High < QualityTier::Ultra);
    }
}
