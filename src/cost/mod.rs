//! Cost rules.
//!
//! Pure functions over the current recital state. Three adjustments shape
//! what an external performer is billed per song:
//!
//! | Adjustment | Effect | Where it lives |
//! |------------|--------|----------------|
//! | Training surcharge | `base_cost *= training_factor` per distinct trained role | baked into `base_cost` by training |
//! | Band discount | `× band_discount_factor` once, if any band is shared with the base roster | [`unit_cost`] |
//! | Star rebate | `star_rebate_rate` of the star performer's total billing | [`recital_cost_breakdown`] |
//!
//! Base performers are always free.

mod breakdown;
mod policy;

pub use breakdown::{recital_cost_breakdown, CostBreakdown, StarPerformer};
pub use policy::CostPolicy;

use crate::models::{Artist, BasePerformer, ExternalPerformer, PerformerRef, Recital, Song};

/// Per-song price of an external performer.
///
/// Starts from `base_cost` (training surcharges included) and applies the
/// band discount once when the performer shares any band with any member of
/// `base_roster`.
pub fn unit_cost(
    performer: &ExternalPerformer,
    base_roster: &[BasePerformer],
    policy: &CostPolicy,
) -> f64 {
    let shares_band = base_roster
        .iter()
        .any(|base| performer.shares_band_with(base));
    if shares_band {
        performer.base_cost() * policy.band_discount_factor
    } else {
        performer.base_cost()
    }
}

/// One external's per-song price split into its stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCosts {
    /// Price with every training surcharge divided out.
    pub without_training: f64,
    /// Price after training (the current `base_cost`).
    pub after_training: f64,
    /// Price after the band discount (what is actually billed).
    pub after_band_discount: f64,
}

impl UnitCosts {
    /// Decomposes the price of `performer` under `policy`.
    pub fn of(
        performer: &ExternalPerformer,
        base_roster: &[BasePerformer],
        policy: &CostPolicy,
    ) -> Self {
        let trainings = performer.trainings_applied() as i32;
        let after_training = performer.base_cost();
        Self {
            without_training: after_training / policy.training_factor.powi(trainings),
            after_training,
            after_band_discount: unit_cost(performer, base_roster, policy),
        }
    }
}

/// Sum of the billed price of every external covering a slot of `song`.
pub fn song_cost(recital: &Recital, song: &Song) -> f64 {
    song.assigned_performers()
        .map(|p| match p {
            PerformerRef::Base(_) => 0.0,
            PerformerRef::External(idx) => recital.unit_cost(idx),
        })
        .sum()
}
