//! Recital cost breakdown.
//!
//! Walks every covered slot, decomposes the billed price of each external
//! into its stages and sums them:
//!
//! ```text
//! total = without_training + training_surcharge - band_discount - star_rebate
//! ```
//!
//! # Star performer
//! Among contracted externals whose preferred recital type matches the
//! recital's, the one with the largest billed total (strictly larger wins,
//! ties keep the earlier one in contract order) earns a rebate of
//! `star_rebate_rate` times that total.

use serde::{Deserialize, Serialize};

use super::UnitCosts;
use crate::models::{Artist, PerformerRef, Recital};

/// The star performer and its rebate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarPerformer {
    /// Index into the external pool.
    pub external: usize,
    /// Performer name.
    pub name: String,
    /// Billed total across the recital (after band discount).
    pub total_billed: f64,
    /// Amount given back.
    pub rebate: f64,
}

/// Decomposed recital cost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Sum of prices with training surcharges divided out.
    pub without_training: f64,
    /// Extra paid because of trainings.
    pub training_surcharge: f64,
    /// Amount saved through shared bands.
    pub band_discount: f64,
    /// Amount given back to the star performer.
    pub star_rebate: f64,
    /// What the recital costs.
    pub total: f64,
    /// The star performer, if any qualified.
    pub star_performer: Option<StarPerformer>,
}

/// Computes the full cost breakdown of the recital's current assignments.
pub fn recital_cost_breakdown(recital: &Recital) -> CostBreakdown {
    let policy = recital.policy();
    let pool = recital.external_pool();
    let roster = recital.base_roster();

    let unit_costs: Vec<UnitCosts> = pool
        .iter()
        .map(|p| UnitCosts::of(p, roster, policy))
        .collect();

    let mut sum_without = 0.0;
    let mut sum_after_training = 0.0;
    let mut sum_after_band = 0.0;
    let mut billed = vec![0.0; pool.len()];

    for song in recital.songs() {
        for performer in song.assigned_performers() {
            if let PerformerRef::External(idx) = performer {
                let costs = &unit_costs[idx];
                sum_without += costs.without_training;
                sum_after_training += costs.after_training;
                sum_after_band += costs.after_band_discount;
                billed[idx] += costs.after_band_discount;
            }
        }
    }

    let mut star: Option<(usize, f64)> = None;
    for idx in recital.contracted_externals() {
        if pool[idx].preferred_type() != Some(recital.recital_type()) {
            continue;
        }
        let best = star.map_or(0.0, |(_, total)| total);
        if billed[idx] > best {
            star = Some((idx, billed[idx]));
        }
    }

    let star_performer = star.map(|(idx, total_billed)| StarPerformer {
        external: idx,
        name: pool[idx].name().to_string(),
        total_billed,
        rebate: total_billed * policy.star_rebate_rate,
    });
    let star_rebate = star_performer.as_ref().map_or(0.0, |s| s.rebate);

    CostBreakdown {
        without_training: sum_without,
        training_surcharge: sum_after_training - sum_without,
        band_discount: sum_after_training - sum_after_band,
        star_rebate,
        total: sum_after_band - star_rebate,
        star_performer,
    }
}
