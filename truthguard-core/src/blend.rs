//! Score blending
//!
//! Turns the synthesizer's raw [`FactorSet`] into the final one. The stages
//! run in a fixed order and each consumes the previous stage's output:
//!
//! 1. Misinformation adjustment (text and URL, only on a positive verdict)
//! 2. Domain trust blend, 0.6 content / 0.4 domain (URL only)
//! 3. Credibility factor merge, or append on miss (URL only)
//! 4. Government/education bonus factor (URL only)
//!
//! This is a one-shot transform. Applying it twice changes the result.

use crate::{clamp_score, round_score, Factor, FactorSet, MisinfoVerdict, TrustSignals, MAX_SCORE};

/// Roles identifying the factual-accuracy factor
pub const FACTUAL_ROLES: &[&str] = &["factual", "accuracy"];

/// Roles identifying the source-credibility factor
pub const CREDIBILITY_ROLES: &[&str] = &["credibility", "source"];

/// Factor appended when no credibility factor exists
pub const DOMAIN_CREDIBILITY_FACTOR: &str = "Indian Source Credibility";

/// Factor appended for government and education domains
pub const GOVERNMENT_EDU_FACTOR: &str = "Indian Government/Educational Source";

pub const GOVERNMENT_EDU_FACTOR_SCORE: i32 = 90;

/// Floor for the inverted factual-accuracy score
pub const MIN_FACTUAL_SCORE: i32 = 5;

const MISINFO_WEIGHT: f64 = 0.7;
const ORIGINAL_WEIGHT: f64 = 0.3;
const CONTENT_WEIGHT: f64 = 0.6;
const DOMAIN_WEIGHT: f64 = 0.4;

/// Stage 1: invert the factual factor and pull the truth score toward the verdict
pub fn apply_misinformation(set: &mut FactorSet, verdict: &MisinfoVerdict) {
    if !verdict.is_misinformation {
        return;
    }

    if let Some(idx) = set.position_of(FACTUAL_ROLES) {
        let factor = &mut set.factors[idx];
        factor.score = (MAX_SCORE - clamp_score(factor.score)).max(MIN_FACTUAL_SCORE);
    }

    let verdict_score = f64::from(MAX_SCORE - clamp_score(verdict.confidence));
    set.truth_score = round_score(
        verdict_score * MISINFO_WEIGHT + f64::from(set.truth_score) * ORIGINAL_WEIGHT,
    );
}

/// Stage 2: blend the content score with the domain trust score
pub fn apply_domain_trust(set: &mut FactorSet, trust: &TrustSignals) {
    set.truth_score = round_score(
        f64::from(set.truth_score) * CONTENT_WEIGHT + f64::from(trust.score) * DOMAIN_WEIGHT,
    );
}

/// Stage 3: merge domain trust into the credibility factor, appending one if missing
pub fn merge_credibility(set: &mut FactorSet, trust: &TrustSignals) {
    match set.position_of(CREDIBILITY_ROLES) {
        Some(idx) => {
            let factor = &mut set.factors[idx];
            factor.score = round_score(f64::from(factor.score) * 0.5 + f64::from(trust.score) * 0.5);
        }
        None => set
            .factors
            .push(Factor::new(DOMAIN_CREDIBILITY_FACTOR, trust.score)),
    }
}

/// Stage 4: government and education domains always get an extra factor
pub fn apply_government_bonus(set: &mut FactorSet, trust: &TrustSignals) {
    if trust.is_government_or_edu {
        set.factors
            .push(Factor::new(GOVERNMENT_EDU_FACTOR, GOVERNMENT_EDU_FACTOR_SCORE));
    }
}

/// Run every applicable stage in order.
///
/// `verdict` is `None` for image and video flows; `trust` is `Some` only for URLs.
pub fn blend(
    mut set: FactorSet,
    verdict: Option<&MisinfoVerdict>,
    trust: Option<&TrustSignals>,
) -> FactorSet {
    let inputs_in_bounds = set.in_bounds()
        && verdict.map_or(true, |v| (0..=100).contains(&v.confidence))
        && trust.map_or(true, |t| (0..=100).contains(&t.score));

    if let Some(verdict) = verdict {
        apply_misinformation(&mut set, verdict);
    }

    if let Some(trust) = trust {
        apply_domain_trust(&mut set, trust);
        merge_credibility(&mut set, trust);
        apply_government_bonus(&mut set, trust);
    }

    // Weighted averages of in-range values stay in range; anything else is a defect.
    debug_assert!(
        !inputs_in_bounds || set.in_bounds(),
        "blend produced out-of-range scores from in-range inputs: {set:?}"
    );
    clamp_all(set)
}

fn clamp_all(mut set: FactorSet) -> FactorSet {
    set.truth_score = clamp_score(set.truth_score);
    for factor in &mut set.factors {
        factor.score = clamp_score(factor.score);
    }
    set
}
