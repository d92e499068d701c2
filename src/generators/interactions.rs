//! Nutrient interaction graph
//!
//! Visits every ordered (source, target) pair of the nutrient vocabulary once,
//! in vocabulary × vocabulary order with the diagonal skipped, and draws an
//! effect from {antagonism, stimulation, none}. Non-"none" draws get a weight
//! in (weight_min, weight_max] rounded to 2 decimals.

use crate::config::DistributionParams;
use crate::error::{Result, SynthError};
use crate::types::{EffectType, NutrientEdge};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Index order of the categorical draw
const EFFECT_CHOICES: [Option<EffectType>; 3] = [
    Some(EffectType::Antagonism),
    Some(EffectType::Stimulation),
    None,
];

pub fn generate_interactions<R: Rng>(
    nutrients: &[String],
    params: &DistributionParams,
    rng: &mut R,
) -> Result<Vec<NutrientEdge>> {
    let p = &params.effect_probabilities;
    let effect_dist = WeightedIndex::new([p.antagonism, p.stimulation, p.none])
        .map_err(|e| SynthError::config("effect_probabilities", e.to_string()))?;

    let mut edges = Vec::new();

    for source in nutrients {
        for target in nutrients {
            if source == target {
                continue;
            }

            let Some(effect) = EFFECT_CHOICES[effect_dist.sample(rng)] else {
                continue;
            };

            let weight = draw_weight(params, rng);
            edges.push(NutrientEdge {
                source: source.clone(),
                target: target.clone(),
                effect,
                weight,
            });
        }
    }

    tracing::info!(
        "Interaction graph: {} edges over {} nutrients",
        edges.len(),
        nutrients.len()
    );

    Ok(edges)
}

/// Uniform in (min, max], rounded to 2 decimals.
///
/// Rounding can land on `min` or just past `max`; the result is clamped in
/// whole hundredths to the 2-decimal values inside the interval, which
/// config validation guarantees is non-empty.
fn draw_weight<R: Rng>(params: &DistributionParams, rng: &mut R) -> f64 {
    let (min, max) = (params.weight_min, params.weight_max);
    let (lowest, highest) = params.weight_cents();
    let u: f64 = rng.gen();
    let cents = ((max - u * (max - min)) * 100.0).round() as i64;
    cents.clamp(lowest, highest.max(lowest)) as f64 / 100.0
}
