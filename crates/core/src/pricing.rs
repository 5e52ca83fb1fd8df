//! Credit pricing policy for generation requests.
//!
//! Pure and deterministic: the caller quotes a cost before submission
//! and debits exactly that amount after a successful submission, so the
//! same inputs must always yield the same integer.

use crate::request::{GenerationOptions, QualityTier};

// ---------------------------------------------------------------------------
// Base rates
// ---------------------------------------------------------------------------

/// Duration unit the per-tier base cost covers. Requests are billed in
/// whole units, rounded up.
pub const BASE_DURATION_SECS: u32 = 10;

/// Base credits per duration unit, low tier.
pub const BASE_COST_LOW: u32 = 5;
/// Base credits per duration unit, medium tier.
pub const BASE_COST_MEDIUM: u32 = 10;
/// Base credits per duration unit, high tier.
pub const BASE_COST_HIGH: u32 = 20;
/// Base credits per duration unit, ultra tier.
pub const BASE_COST_ULTRA: u32 = 40;

// ---------------------------------------------------------------------------
// Feature surcharges
// ---------------------------------------------------------------------------

/// Flat surcharge for studio-quality audio post-processing.
pub const SURCHARGE_ENHANCED_AUDIO: u32 = 3;
/// Flat surcharge for cinematic camera movement.
pub const SURCHARGE_CINEMATIC_CAMERA: u32 = 5;
/// Flat surcharge for dynamic relighting.
pub const SURCHARGE_DYNAMIC_LIGHTING: u32 = 4;

/// Base credits per duration unit for a quality tier.
pub fn tier_base_cost(tier: QualityTier) -> u32 {
    match tier {
        QualityTier::Low => BASE_COST_LOW,
        QualityTier::Medium => BASE_COST_MEDIUM,
        QualityTier::High => BASE_COST_HIGH,
        QualityTier::Ultra => BASE_COST_ULTRA,
    }
}

/// Sum of flat surcharges for the enabled feature flags. Independent of
/// tier and duration.
pub fn options_surcharge(options: &GenerationOptions) -> u32 {
    let mut surcharge = 0;
    if options.enhanced_audio {
        surcharge += SURCHARGE_ENHANCED_AUDIO;
    }
    if options.cinematic_camera {
        surcharge += SURCHARGE_CINEMATIC_CAMERA;
    }
    if options.dynamic_lighting {
        surcharge += SURCHARGE_DYNAMIC_LIGHTING;
    }
    surcharge
}

/// Credit cost of a generation request.
///
/// `tier base * ceil(duration / BASE_DURATION_SECS) + surcharges`.
/// A zero-second duration still bills one unit.
pub fn credit_cost(tier: QualityTier, duration_secs: u32, options: &GenerationOptions) -> u32 {
    let units = duration_secs.div_ceil(BASE_DURATION_SECS).max(1);
    tier_base_cost(tier) * units + options_surcharge(options)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TIERS: [QualityTier; 4] = [
        QualityTier::Low,
        QualityTier::Medium,
        QualityTier::High,
        QualityTier::Ultra,
    ];

    #[test]
    fn medium_single_unit() {
        assert_eq!(
            credit_cost(QualityTier::Medium, 10, &GenerationOptions::default()),
            BASE_COST_MEDIUM
        );
    }

    #[test]
    fn partial_unit_rounds_up() {
        assert_eq!(
            credit_cost(QualityTier::Low, 11, &GenerationOptions::default()),
            BASE_COST_LOW * 2
        );
    }

    #[test]
    fn zero_duration_bills_one_unit() {
        assert_eq!(
            credit_cost(QualityTier::High, 0, &GenerationOptions::default()),
            BASE_COST_HIGH
        );
    }

    #[test]
    fn surcharges_sum_independently() {
        let options = GenerationOptions {
            enhanced_audio: true,
            cinematic_camera: true,
            dynamic_lighting: true,
        };
        assert_eq!(
            credit_cost(QualityTier::Low, 10, &options),
            BASE_COST_LOW
                + SURCHARGE_ENHANCED_AUDIO
                + SURCHARGE_CINEMATIC_CAMERA
                + SURCHARGE_DYNAMIC_LIGHTING
        );
    }

    #[test]
    fn deterministic_across_calls() {
        let options = GenerationOptions {
            enhanced_audio: true,
            ..Default::default()
        };
        let first = credit_cost(QualityTier::Medium, 25, &options);
        for _ in 0..100 {
            assert_eq!(credit_cost(QualityTier::Medium, 25, &options), first);
        }
    }

    #[test]
    fn monotonic_in_duration_for_every_tier() {
        let options = GenerationOptions::default();
        for tier in ALL_TIERS {
            for duration in [1, 5, 10, 30, 65] {
                assert!(
                    credit_cost(tier, duration * 2, &options) >= credit_cost(tier, duration, &options)
                );
            }
        }
    }

    #[test]
    fn tiers_strictly_ordered() {
        let options = GenerationOptions::default();
        let costs: Vec<u32> = ALL_TIERS
            .iter()
            .map(|&t| credit_cost(t, 10, &options))
            .collect();
        assert!(costs.windows(2).all(|w| w[0] < w[1]));
    }
}
