//! Staffing planners.
//!
//! Two strategies fill open role slots:
//!
//! - [`GreedyFiller`] staffs one song at a time: free base performers first,
//!   then the cheapest eligible external per slot. Fast, not optimal.
//! - [`BacktrackingOptimizer`] explores every external assignment for all
//!   pending slots of the recital and keeps the cheapest complete one.
//!   Exponential; meant for small recitals.
//!
//! Both leave the recital exactly as they found it when they fail.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4 (dispatching) and Ch. 5 (branch and bound)

mod greedy;
mod optimizer;

pub use greedy::{FillOutcome, GreedyFiller};
pub use optimizer::{BacktrackingOptimizer, OptimizationReport, PendingSlot};

use tracing::debug;

use crate::models::{PerformerRef, Recital, SongId};

/// Covers every open slot of `song` that a free base performer can take.
///
/// Slots are visited in order; the first capable base performer not yet in
/// the song wins. Returns the slots that were filled.
pub(crate) fn fill_with_base(recital: &mut Recital, song: SongId) -> Vec<usize> {
    let mut filled = Vec::new();
    for slot in recital.song(song).open_slots() {
        let role = recital.song(song).slots()[slot].role;
        if let Some(base) = recital.first_free_base(song, role) {
            recital.assign(song, slot, PerformerRef::Base(base));
            debug!(
                song = %recital.song(song).title,
                %role,
                performer = recital.performer_name(PerformerRef::Base(base)),
                "base performer assigned"
            );
            filled.push(slot);
        }
    }
    filled
}

/// Empties the given slots of `song`, releasing external bookings.
pub(crate) fn vacate(recital: &mut Recital, song: SongId, slots: &[usize]) {
    for &slot in slots {
        recital.unassign(song, slot);
    }
}
