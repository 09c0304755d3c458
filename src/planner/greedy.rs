//! Greedy song filler.
//!
//! # Algorithm
//!
//! For one song:
//! 1. Cover open slots with free base performers (first capable one wins).
//! 2. Cover each remaining slot with the eligible external of lowest unit
//!    cost (ties keep pool order).
//! 3. If some slot has no candidate, undo every assignment made by this
//!    call and report the role.
//!
//! # Complexity
//! O(s * (b + e)) per song, where s=slots, b=base roster, e=external pool.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{fill_with_base, vacate};
use crate::error::{StaffingError, StaffingResult};
use crate::models::{PerformerRef, Recital, RoleKind, SongId};

/// What a successful fill changed in one song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOutcome {
    /// Song that was filled.
    pub song: SongId,
    /// Slots covered by base performers.
    pub base_slots: Vec<usize>,
    /// Slots covered by externals.
    pub external_slots: Vec<usize>,
}

impl FillOutcome {
    fn unchanged(song: SongId) -> Self {
        Self {
            song,
            base_slots: Vec::new(),
            external_slots: Vec::new(),
        }
    }

    /// Total number of slots covered by the fill.
    pub fn filled_count(&self) -> usize {
        self.base_slots.len() + self.external_slots.len()
    }

    /// Whether the song was already complete.
    pub fn is_unchanged(&self) -> bool {
        self.filled_count() == 0
    }
}

/// Cheapest-first greedy filler.
///
/// # Example
///
/// ```
/// use recital_staffing::models::{ExternalPerformer, Recital, RecitalType, RoleKind, Song, SongId};
/// use recital_staffing::planner::GreedyFiller;
///
/// let mut recital = Recital::new("Unplugged", RecitalType::Pop)
///     .with_external(ExternalPerformer::new("Expensive", 2000.0, 3).with_role(RoleKind::LeadVocal))
///     .with_external(ExternalPerformer::new("Cheap", 500.0, 3).with_role(RoleKind::LeadVocal))
///     .with_song(Song::new("Intro").with_role(RoleKind::LeadVocal));
///
/// let outcome = GreedyFiller::new().fill_song(&mut recital, SongId(0)).unwrap();
/// assert_eq!(outcome.external_slots, vec![0]);
/// assert!((recital.song_cost(SongId(0)) - 500.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyFiller;

impl GreedyFiller {
    pub fn new() -> Self {
        Self
    }

    /// Covers every open slot of `song`.
    ///
    /// A complete song is left alone and yields an unchanged outcome.
    ///
    /// # Errors
    /// [`StaffingError::NoPerformerAvailable`] for the first slot no one can
    /// take. Base and external assignments made by this call are undone
    /// first, so the recital is exactly as before.
    pub fn fill_song(&self, recital: &mut Recital, song: SongId) -> StaffingResult<FillOutcome> {
        if recital.song(song).is_complete() {
            debug!(song = %recital.song(song).title, "song already complete");
            return Ok(FillOutcome::unchanged(song));
        }

        let base_slots = fill_with_base(recital, song);
        let mut external_slots = Vec::new();

        for slot in recital.song(song).open_slots() {
            let role = recital.song(song).slots()[slot].role;
            let Some(external) = cheapest_external(recital, song, role) else {
                vacate(recital, song, &external_slots);
                vacate(recital, song, &base_slots);
                let title = recital.song(song).title.clone();
                warn!(
                    song = %title,
                    %role,
                    undone = base_slots.len() + external_slots.len(),
                    "no performer available, song fill rolled back"
                );
                return Err(StaffingError::NoPerformerAvailable { song: title, role });
            };

            let performer = PerformerRef::External(external);
            recital.assign(song, slot, performer);
            debug!(
                song = %recital.song(song).title,
                %role,
                performer = recital.performer_name(performer),
                unit_cost = recital.unit_cost(external),
                "external performer assigned"
            );
            external_slots.push(slot);
        }

        info!(
            song = %recital.song(song).title,
            base = base_slots.len(),
            external = external_slots.len(),
            cost = recital.song_cost(song),
            "song filled"
        );
        Ok(FillOutcome {
            song,
            base_slots,
            external_slots,
        })
    }

    /// Fills every incomplete song in order.
    ///
    /// # Errors
    /// The first song failure. Songs filled before it stay filled; the
    /// failing song itself is untouched.
    pub fn fill_recital(&self, recital: &mut Recital) -> StaffingResult<Vec<FillOutcome>> {
        let pending: Vec<SongId> = recital
            .song_ids()
            .filter(|&id| !recital.song(id).is_complete())
            .collect();

        let mut outcomes = Vec::with_capacity(pending.len());
        for song in pending {
            outcomes.push(self.fill_song(recital, song)?);
        }

        info!(
            recital = recital.name(),
            songs = outcomes.len(),
            total_cost = recital.total_cost(),
            "recital filled"
        );
        Ok(outcomes)
    }
}

/// Eligible external with the lowest unit cost; the earliest in the pool
/// wins ties.
fn cheapest_external(recital: &Recital, song: SongId, role: RoleKind) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for idx in recital.eligible_externals(song, role) {
        let cost = recital.unit_cost(idx);
        if best.map_or(true, |(_, best_cost)| cost < best_cost) {
            best = Some((idx, cost));
        }
    }
    best.map(|(idx, _)| idx)
}
