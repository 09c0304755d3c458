//! Global cost optimizer.
//!
//! # Algorithm
//!
//! 1. Base-fill every incomplete song (same rule as the greedy filler).
//! 2. Collect the slots still open, in song then slot order.
//! 3. Depth-first search over those slots. At each level the eligible
//!    externals are tried cheapest first: assign, recurse, undo.
//! 4. At every leaf the full recital cost (discounts and star rebate
//!    included) is compared with the best so far; strictly lower wins.
//! 5. Apply the best mapping, or undo step 1 and fail.
//!
//! Because the star rebate depends on the whole assignment, leaves are
//! priced with the complete cost breakdown rather than summed unit costs.
//!
//! # Complexity
//! O(e^p) leaves in the worst case, where e=external pool, p=pending slots.
//! No size bound is enforced.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{fill_with_base, vacate};
use crate::error::{StaffingError, StaffingResult};
use crate::models::{PerformerRef, Recital, RoleKind, SongId};

/// A slot left open after base filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSlot {
    pub song: SongId,
    pub slot: usize,
    pub role: RoleKind,
}

/// Summary of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// Slots covered by base performers before the search.
    pub base_slots: usize,
    /// Slots the search had to cover with externals.
    pub pending_slots: Vec<PendingSlot>,
    /// Complete assignments evaluated.
    pub leaves_explored: u64,
    /// Recital cost after applying the best assignment.
    pub best_total: f64,
}

/// Exhaustive cheapest-first backtracking over external assignments.
///
/// # Example
///
/// ```
/// use recital_staffing::models::{ExternalPerformer, Recital, RecitalType, RoleKind, Song};
/// use recital_staffing::planner::BacktrackingOptimizer;
///
/// let mut recital = Recital::new("Two Songs", RecitalType::Pop)
///     .with_external(ExternalPerformer::new("Barato", 500.0, 1).with_role(RoleKind::LeadVocal))
///     .with_external(ExternalPerformer::new("Caro", 2000.0, 2).with_role(RoleKind::LeadVocal))
///     .with_song(Song::new("A").with_role(RoleKind::LeadVocal))
///     .with_song(Song::new("B").with_role(RoleKind::LeadVocal));
///
/// let report = BacktrackingOptimizer::new().optimize(&mut recital).unwrap();
/// assert!(recital.is_fully_staffed());
/// assert!((report.best_total - 2500.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BacktrackingOptimizer;

impl BacktrackingOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Staffs every open slot of the recital at minimum total cost.
    ///
    /// # Errors
    /// [`StaffingError::NoPerformerAvailable`] naming the first pending
    /// slot when no complete assignment exists. Base assignments made by
    /// this call are undone first.
    pub fn optimize(&self, recital: &mut Recital) -> StaffingResult<OptimizationReport> {
        let songs: Vec<SongId> = recital.song_ids().collect();
        let mut base_filled = Vec::new();
        for song in songs {
            if recital.song(song).is_complete() {
                continue;
            }
            let filled = fill_with_base(recital, song);
            if !filled.is_empty() {
                base_filled.push((song, filled));
            }
        }
        let base_slots = base_filled.iter().map(|(_, slots)| slots.len()).sum();

        let pending = pending_slots(recital);
        if pending.is_empty() {
            info!(
                recital = recital.name(),
                base_slots, "nothing left for externals after base filling"
            );
            return Ok(OptimizationReport {
                base_slots,
                pending_slots: pending,
                leaves_explored: 0,
                best_total: recital.total_cost(),
            });
        }

        let mut search = Search {
            pending: &pending,
            current: Vec::with_capacity(pending.len()),
            best: None,
            leaves: 0,
        };
        search.explore(recital, 0);
        let leaves_explored = search.leaves;

        let Some((mapping, _)) = search.best else {
            for (song, slots) in &base_filled {
                vacate(recital, *song, slots);
            }
            let first = pending[0];
            let title = recital.song(first.song).title.clone();
            warn!(
                recital = recital.name(),
                pending = pending.len(),
                leaves_explored,
                "no complete assignment exists"
            );
            return Err(StaffingError::NoPerformerAvailable {
                song: title,
                role: first.role,
            });
        };

        for (target, external) in pending.iter().zip(mapping) {
            recital.assign(target.song, target.slot, PerformerRef::External(external));
        }

        let best_total = recital.total_cost();
        info!(
            recital = recital.name(),
            pending = pending.len(),
            leaves_explored,
            best_total,
            "recital optimized"
        );
        Ok(OptimizationReport {
            base_slots,
            pending_slots: pending,
            leaves_explored,
            best_total,
        })
    }
}

fn pending_slots(recital: &Recital) -> Vec<PendingSlot> {
    let mut pending = Vec::new();
    for song in recital.song_ids() {
        let target = recital.song(song);
        for slot in target.open_slots() {
            pending.push(PendingSlot {
                song,
                slot,
                role: target.slots()[slot].role,
            });
        }
    }
    pending
}

/// Depth-first search state.
struct Search<'a> {
    pending: &'a [PendingSlot],
    /// External chosen for each pending slot on the current path.
    current: Vec<usize>,
    best: Option<(Vec<usize>, f64)>,
    leaves: u64,
}

impl Search<'_> {
    fn explore(&mut self, recital: &mut Recital, depth: usize) {
        if depth == self.pending.len() {
            self.leaves += 1;
            let total = recital.total_cost();
            if self.best.as_ref().map_or(true, |(_, best)| total < *best) {
                debug!(total, leaf = self.leaves, "new best assignment");
                self.best = Some((self.current.clone(), total));
            }
            return;
        }

        let PendingSlot { song, slot, role } = self.pending[depth];
        let mut candidates = recital.eligible_externals(song, role);
        candidates.sort_by(|&a, &b| recital.unit_cost(a).total_cmp(&recital.unit_cost(b)));

        for external in candidates {
            recital.assign(song, slot, PerformerRef::External(external));
            self.current.push(external);
            self.explore(recital, depth + 1);
            self.current.pop();
            recital.unassign(song, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BasePerformer, ExternalPerformer, RecitalType, Song};
    use crate::planner::GreedyFiller;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_two_songs_capacity_split() {
        let mut r = Recital::new("R", RecitalType::Pop)
            .with_external(ExternalPerformer::new("Barato", 500.0, 1).with_role(RoleKind::LeadVocal))
            .with_external(ExternalPerformer::new("Caro", 2000.0, 2).with_role(RoleKind::LeadVocal))
            .with_song(Song::new("A").with_role(RoleKind::LeadVocal))
            .with_song(Song::new("B").with_role(RoleKind::LeadVocal));

        let report = BacktrackingOptimizer::new().optimize(&mut r).unwrap();
        assert_eq!(r.external(0).songs_assigned(), 1);
        assert_eq!(r.external(1).songs_assigned(), 1);
        assert!((r.total_cost() - 2500.0).abs() < 1e-10);
        assert!((report.best_total - 2500.0).abs() < 1e-10);
        assert_eq!(report.pending_slots.len(), 2);
        assert!(report.leaves_explored >= 1);
    }

    #[test]
    fn test_beats_greedy_when_capacity_matters() {
        // Greedy hands the versatile cheap performer to the first song and
        // then has to pay for the expensive pianist.
        let recital = Recital::new("R", RecitalType::Pop)
            .with_external(
                ExternalPerformer::new("Versatile", 100.0, 1)
                    .with_roles([RoleKind::LeadVocal, RoleKind::Piano]),
            )
            .with_external(ExternalPerformer::new("Singer", 150.0, 1).with_role(RoleKind::LeadVocal))
            .with_external(ExternalPerformer::new("Pianist", 1000.0, 1).with_role(RoleKind::Piano))
            .with_song(Song::new("A").with_role(RoleKind::LeadVocal))
            .with_song(Song::new("B").with_role(RoleKind::Piano));

        let mut greedy = recital.clone();
        GreedyFiller::new().fill_recital(&mut greedy).unwrap();
        assert!((greedy.total_cost() - 1100.0).abs() < 1e-10);

        let mut optimized = recital;
        BacktrackingOptimizer::new().optimize(&mut optimized).unwrap();
        assert!((optimized.total_cost() - 250.0).abs() < 1e-10);
        assert_eq!(optimized.external(2).songs_assigned(), 0);
    }

    #[test]
    fn test_star_rebate_is_priced_in() {
        let mut r = Recital::new("R", RecitalType::Rock)
            .with_external(ExternalPerformer::new("Session", 800.0, 1).with_role(RoleKind::LeadVocal))
            .with_external(
                ExternalPerformer::new("Rocker", 1000.0, 1)
                    .with_role(RoleKind::LeadVocal)
                    .with_preferred_type(RecitalType::Rock),
            )
            .with_song(Song::new("A").with_role(RoleKind::LeadVocal));

        BacktrackingOptimizer::new().optimize(&mut r).unwrap();
        assert_eq!(r.external(1).songs_assigned(), 1);
        assert!((r.total_cost() - 750.0).abs() < 1e-10);
    }

    #[test]
    fn test_failure_restores_base_assignments() {
        let mut r = Recital::new("R", RecitalType::Rock)
            .with_base(BasePerformer::new("Brian").with_role(RoleKind::ElectricGuitar))
            .with_external(ExternalPerformer::new("Singer", 900.0, 2).with_role(RoleKind::LeadVocal))
            .with_song(Song::new("A").with_roles([RoleKind::ElectricGuitar, RoleKind::LeadVocal]))
            .with_song(Song::new("B").with_role(RoleKind::Drums));
        let before = r.clone();

        let err = BacktrackingOptimizer::new().optimize(&mut r).unwrap_err();
        // The first pending slot is reported, not the one that blocks.
        assert_eq!(
            err,
            StaffingError::NoPerformerAvailable {
                song: "A".into(),
                role: RoleKind::LeadVocal
            }
        );
        assert_eq!(r.songs(), before.songs());
        assert_eq!(r.external(0).songs_assigned(), 0);
    }

    #[test]
    fn test_base_only_needs_no_search() {
        let mut r = Recital::new("R", RecitalType::Rock)
            .with_base(BasePerformer::new("Freddie").with_role(RoleKind::LeadVocal))
            .with_song(Song::new("A").with_role(RoleKind::LeadVocal))
            .with_song(Song::new("B").with_role(RoleKind::LeadVocal));

        let report = BacktrackingOptimizer::new().optimize(&mut r).unwrap();
        assert_eq!(report.base_slots, 2);
        assert!(report.pending_slots.is_empty());
        assert_eq!(report.leaves_explored, 0);
        assert!(r.is_fully_staffed());
    }

    #[test]
    fn test_already_staffed_recital() {
        let mut r = Recital::new("R", RecitalType::Pop)
            .with_external(ExternalPerformer::new("Singer", 900.0, 1).with_role(RoleKind::LeadVocal))
            .with_song(Song::new("A").with_role(RoleKind::LeadVocal));
        r.assign(SongId(0), 0, PerformerRef::External(0));

        let report = BacktrackingOptimizer::new().optimize(&mut r).unwrap();
        assert_eq!(report.base_slots, 0);
        assert!((report.best_total - 900.0).abs() < 1e-10);
        assert_eq!(r.external(0).songs_assigned(), 1);
    }

    fn random_recital(rng: &mut StdRng) -> Recital {
        let roles = [RoleKind::LeadVocal, RoleKind::Bass, RoleKind::Drums];
        let types = [RecitalType::Rock, RecitalType::Pop, RecitalType::Country];
        let mut r = Recital::new("Random", types[rng.random_range(0..3)]);

        if rng.random_bool(0.5) {
            r = r.with_base(
                BasePerformer::new("Base")
                    .with_role(roles[rng.random_range(0..3)])
                    .with_band("House"),
            );
        }
        for i in 0..4 {
            let mut p = ExternalPerformer::new(
                format!("E{i}"),
                rng.random_range(1..20) as f64 * 100.0,
                rng.random_range(1..3),
            )
            .with_role(roles[rng.random_range(0..3)])
            .with_role(roles[rng.random_range(0..3)]);
            if rng.random_bool(0.3) {
                p = p.with_band("House");
            }
            if rng.random_bool(0.5) {
                p = p.with_preferred_type(types[rng.random_range(0..3)]);
            }
            r = r.with_external(p);
        }
        for s in 0..3 {
            let mut song = Song::new(format!("S{s}")).with_role(roles[rng.random_range(0..3)]);
            if rng.random_bool(0.5) {
                song = song.with_role(roles[rng.random_range(0..3)]);
            }
            r = r.with_song(song);
        }
        r
    }

    #[test]
    fn test_never_worse_than_greedy() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut compared = 0;

        for _ in 0..200 {
            let recital = random_recital(&mut rng);

            let mut greedy = recital.clone();
            let greedy_result = GreedyFiller::new().fill_recital(&mut greedy);

            let mut optimized = recital.clone();
            match BacktrackingOptimizer::new().optimize(&mut optimized) {
                Ok(report) => {
                    assert!(optimized.is_fully_staffed());
                    assert!((report.best_total - optimized.total_cost()).abs() < 1e-9);
                    if greedy_result.is_ok() {
                        assert!(optimized.total_cost() <= greedy.total_cost() + 1e-9);
                        compared += 1;
                    }
                }
                Err(_) => {
                    assert!(greedy_result.is_err(), "greedy found what the search missed");
                    assert_eq!(optimized.songs(), recital.songs());
                }
            }
        }

        assert!(compared > 0);
    }
}
