//! Recital aggregate.
//!
//! The recital owns its songs and both performer rosters. Slots point into
//! the rosters with [`PerformerRef`] handles, so every mutation of an
//! assignment goes through the recital: that is the only place where a
//! slot change and the matching external song counter change happen
//! together.
//!
//! # Invariants
//! - A covered slot holds a performer able to play its role.
//! - A performer covers at most one slot per song.
//! - An external's `songs_assigned` equals the number of slots it covers and
//!   never exceeds `max_songs`.
//!
//! Breaking one of these is a programming error and panics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tracing::{debug, info};

use super::{
    Artist, BasePerformer, ExternalPerformer, PerformerRef, RecitalType, RoleKind, Song, SongId,
};
use crate::cost::{self, CostBreakdown, CostPolicy};
use crate::error::{StaffingError, StaffingResult};
use crate::snapshot::RecitalSnapshot;

/// A recital: songs to staff, the label's roster and the hiring pool.
///
/// Serializes through [`RecitalSnapshot`]; deserializing goes through
/// [`Recital::from_snapshot`], so an inconsistent document is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RecitalSnapshot", into = "RecitalSnapshot")]
pub struct Recital {
    name: String,
    recital_type: RecitalType,
    songs: Vec<Song>,
    base_roster: Vec<BasePerformer>,
    external_pool: Vec<ExternalPerformer>,
    policy: CostPolicy,
}

impl Recital {
    /// Creates an empty recital with the default cost policy.
    pub fn new(name: impl Into<String>, recital_type: RecitalType) -> Self {
        Self {
            name: name.into(),
            recital_type,
            songs: Vec::new(),
            base_roster: Vec::new(),
            external_pool: Vec::new(),
            policy: CostPolicy::default(),
        }
    }

    /// Adds a song.
    pub fn with_song(mut self, song: Song) -> Self {
        self.songs.push(song);
        self
    }

    /// Adds an in-house performer.
    pub fn with_base(mut self, performer: BasePerformer) -> Self {
        self.base_roster.push(performer);
        self
    }

    /// Adds a performer to the hiring pool.
    pub fn with_external(mut self, performer: ExternalPerformer) -> Self {
        self.external_pool.push(performer);
        self
    }

    /// Sets the cost policy.
    ///
    /// # Panics
    /// If the policy fails [`CostPolicy::validate`]. Callers holding an
    /// unchecked policy (config, snapshots) validate it first.
    pub fn with_policy(mut self, policy: CostPolicy) -> Self {
        if let Err(err) = policy.validate() {
            panic!("recital '{}': {err}", self.name);
        }
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn recital_type(&self) -> RecitalType {
        self.recital_type
    }

    pub fn policy(&self) -> &CostPolicy {
        &self.policy
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// # Panics
    /// If `id` is out of range.
    pub fn song(&self, id: SongId) -> &Song {
        &self.songs[id.0]
    }

    /// Raw access to a song's slots, bypassing counter bookkeeping.
    pub(crate) fn song_mut(&mut self, id: SongId) -> &mut Song {
        &mut self.songs[id.0]
    }

    /// Song ids in recital order.
    pub fn song_ids(&self) -> impl Iterator<Item = SongId> {
        (0..self.songs.len()).map(SongId)
    }

    pub fn base_roster(&self) -> &[BasePerformer] {
        &self.base_roster
    }

    pub fn external_pool(&self) -> &[ExternalPerformer] {
        &self.external_pool
    }

    /// # Panics
    /// If `idx` is out of range.
    pub fn external(&self, idx: usize) -> &ExternalPerformer {
        &self.external_pool[idx]
    }

    /// Resolves a handle to the performer's shared capabilities.
    pub fn performer(&self, performer: PerformerRef) -> &dyn Artist {
        match performer {
            PerformerRef::Base(idx) => &self.base_roster[idx],
            PerformerRef::External(idx) => &self.external_pool[idx],
        }
    }

    /// Whether the handle points inside the rosters.
    pub fn has_performer(&self, performer: PerformerRef) -> bool {
        match performer {
            PerformerRef::Base(idx) => idx < self.base_roster.len(),
            PerformerRef::External(idx) => idx < self.external_pool.len(),
        }
    }

    pub fn performer_name(&self, performer: PerformerRef) -> &str {
        self.performer(performer).name()
    }

    /// Looks a performer up by name, base roster first.
    pub fn find_performer(&self, name: &str) -> Option<PerformerRef> {
        self.find_base(name)
            .map(PerformerRef::Base)
            .or_else(|| self.find_external(name).map(PerformerRef::External))
    }

    pub fn find_base(&self, name: &str) -> Option<usize> {
        self.base_roster.iter().position(|p| p.name() == name)
    }

    pub fn find_external(&self, name: &str) -> Option<usize> {
        self.external_pool.iter().position(|p| p.name() == name)
    }

    pub fn find_song(&self, title: &str) -> Option<SongId> {
        self.songs.iter().position(|s| s.title == title).map(SongId)
    }

    /// Covers a slot with a performer.
    ///
    /// For externals the song counter is incremented.
    ///
    /// # Panics
    /// If the slot is already covered, the performer cannot play the slot's
    /// role, the performer already covers another slot of the song, or an
    /// external is at its song limit.
    pub fn assign(&mut self, song: SongId, slot: usize, performer: PerformerRef) {
        let target = &self.songs[song.0];
        let role = target.slots()[slot].role;
        let name = self.performer(performer).name();

        assert!(
            !target.slots()[slot].is_covered(),
            "slot {slot} of song '{}' is already covered",
            target.title
        );
        assert!(
            self.performer(performer).can_perform(role),
            "performer '{name}' cannot play {role}"
        );
        assert!(
            !target.features(performer),
            "performer '{name}' already plays in song '{}'",
            target.title
        );

        if let PerformerRef::External(idx) = performer {
            self.external_pool[idx].register_song();
        }
        self.songs[song.0].set_performer(slot, performer);
    }

    /// Empties a slot, releasing the external's song if there was one.
    pub fn unassign(&mut self, song: SongId, slot: usize) -> Option<PerformerRef> {
        let previous = self.songs[song.0].clear_slot(slot);
        if let Some(PerformerRef::External(idx)) = previous {
            self.external_pool[idx].release_song();
        }
        previous
    }

    /// Externals able to take `role` in `song`: they play the role, have
    /// capacity left and are not already in the song. Pool order.
    pub fn eligible_externals(&self, song: SongId, role: RoleKind) -> Vec<usize> {
        let target = &self.songs[song.0];
        self.external_pool
            .iter()
            .enumerate()
            .filter(|(idx, p)| {
                p.can_perform(role)
                    && p.has_capacity()
                    && !target.features(PerformerRef::External(*idx))
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// First base performer able to take `role` in `song` who is not
    /// already in it.
    pub fn first_free_base(&self, song: SongId, role: RoleKind) -> Option<usize> {
        let target = &self.songs[song.0];
        self.base_roster
            .iter()
            .enumerate()
            .find(|(idx, p)| p.can_perform(role) && !target.features(PerformerRef::Base(*idx)))
            .map(|(idx, _)| idx)
    }

    /// Number of slots (across all songs) covered by the performer.
    pub fn slots_held_by(&self, performer: PerformerRef) -> usize {
        self.songs
            .iter()
            .flat_map(|s| s.assigned_performers())
            .filter(|p| *p == performer)
            .count()
    }

    /// Missing roles of one song, counted per role.
    pub fn song_missing_roles(&self, song: SongId) -> BTreeMap<RoleKind, u32> {
        self.songs[song.0].missing_role_counts()
    }

    /// Missing roles across every song, counted per role.
    pub fn missing_roles(&self) -> BTreeMap<RoleKind, u32> {
        let mut totals = BTreeMap::new();
        for song in &self.songs {
            for role in song.missing_roles() {
                *totals.entry(role).or_insert(0) += 1;
            }
        }
        totals
    }

    /// Songs with every slot covered.
    pub fn complete_song_count(&self) -> usize {
        self.songs.iter().filter(|s| s.is_complete()).count()
    }

    pub fn is_fully_staffed(&self) -> bool {
        self.songs.iter().all(Song::is_complete)
    }

    /// Externals covering at least one slot, in order of first appearance.
    pub fn contracted_externals(&self) -> Vec<usize> {
        let mut contracted = Vec::new();
        for song in &self.songs {
            for idx in song.assigned_performers().filter_map(|p| p.external_index()) {
                if !contracted.contains(&idx) {
                    contracted.push(idx);
                }
            }
        }
        contracted
    }

    /// Effective per-song price of an external under this recital's roster.
    pub fn unit_cost(&self, external: usize) -> f64 {
        cost::unit_cost(&self.external_pool[external], &self.base_roster, &self.policy)
    }

    /// Cost of a single song (base performers are free).
    pub fn song_cost(&self, song: SongId) -> f64 {
        cost::song_cost(self, &self.songs[song.0])
    }

    /// Full cost decomposition of the current assignments.
    pub fn cost_breakdown(&self) -> CostBreakdown {
        cost::recital_cost_breakdown(self)
    }

    /// Total cost after every discount, equal to `cost_breakdown().total`.
    pub fn total_cost(&self) -> f64 {
        self.cost_breakdown().total
    }

    /// Whether the external can still be trained (no songs booked).
    pub fn can_train(&self, external: usize) -> bool {
        self.external_pool[external].songs_assigned() == 0
    }

    /// Trains an external into `role`.
    ///
    /// Returns `Ok(true)` when the role was new (and the cost went up by
    /// the policy's training factor), `Ok(false)` when it was already held.
    ///
    /// # Errors
    /// [`StaffingError::PerformerNotTrainable`] if the performer already
    /// covers a song; nothing is changed in that case.
    pub fn train(&mut self, external: usize, role: RoleKind) -> StaffingResult<bool> {
        let factor = self.policy.training_factor;
        let performer = &mut self.external_pool[external];
        if performer.songs_assigned() > 0 {
            return Err(StaffingError::PerformerNotTrainable {
                performer: performer.name().to_string(),
                reason: format!(
                    "already booked for {} song(s) of this recital",
                    performer.songs_assigned()
                ),
            });
        }

        let learned = performer.learn_role(role, factor);
        if learned {
            info!(
                performer = performer.name(),
                %role,
                base_cost = performer.base_cost(),
                "performer trained"
            );
        } else {
            debug!(performer = performer.name(), %role, "role already held, training skipped");
        }
        Ok(learned)
    }

    /// Takes an external out of every slot it covers.
    ///
    /// The performer stays in the pool. Returns how many slots were vacated.
    pub fn remove_performer(&mut self, external: usize) -> usize {
        if self.external_pool[external].songs_assigned() == 0 {
            return 0;
        }

        let target = PerformerRef::External(external);
        let mut vacated = 0;
        for song_idx in 0..self.songs.len() {
            for slot in 0..self.songs[song_idx].slot_count() {
                if self.songs[song_idx].slots()[slot].performer() == Some(target) {
                    self.unassign(SongId(song_idx), slot);
                    vacated += 1;
                }
            }
        }

        info!(
            performer = self.external_pool[external].name(),
            vacated, "performer removed from recital"
        );
        vacated
    }
}
