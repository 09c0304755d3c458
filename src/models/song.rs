//! Song model.
//!
//! A song is a title plus an ordered list of role slots. Each slot asks for
//! one role and holds at most one performer handle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{PerformerRef, RoleKind};

/// Index of a song within its recital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SongId(pub usize);

/// One required role instance inside a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSlot {
    /// Role this slot asks for.
    pub role: RoleKind,
    /// Performer covering the slot, if any.
    performer: Option<PerformerRef>,
}

impl RoleSlot {
    pub fn new(role: RoleKind) -> Self {
        Self {
            role,
            performer: None,
        }
    }

    pub fn performer(&self) -> Option<PerformerRef> {
        self.performer
    }

    pub fn is_covered(&self) -> bool {
        self.performer.is_some()
    }
}

/// A song of the recital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Song {
    /// Song title.
    pub title: String,
    slots: Vec<RoleSlot>,
}

impl Song {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slots: Vec::new(),
        }
    }

    /// Adds a required role.
    pub fn with_role(mut self, role: RoleKind) -> Self {
        self.slots.push(RoleSlot::new(role));
        self
    }

    /// Adds several required roles.
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleKind>) -> Self {
        self.slots.extend(roles.into_iter().map(RoleSlot::new));
        self
    }

    pub fn slots(&self) -> &[RoleSlot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether every slot is covered.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(RoleSlot::is_covered)
    }

    /// Indices of uncovered slots, in slot order.
    pub fn open_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_covered())
            .map(|(i, _)| i)
            .collect()
    }

    /// Roles of uncovered slots, in slot order.
    pub fn missing_roles(&self) -> Vec<RoleKind> {
        self.slots
            .iter()
            .filter(|s| !s.is_covered())
            .map(|s| s.role)
            .collect()
    }

    /// Uncovered slots counted per role.
    pub fn missing_role_counts(&self) -> BTreeMap<RoleKind, u32> {
        let mut counts = BTreeMap::new();
        for role in self.missing_roles() {
            *counts.entry(role).or_insert(0) += 1;
        }
        counts
    }

    /// Required slots of the given role.
    pub fn demand_for(&self, role: RoleKind) -> usize {
        self.slots.iter().filter(|s| s.role == role).count()
    }

    /// Performers currently covering a slot, in slot order.
    pub fn assigned_performers(&self) -> impl Iterator<Item = PerformerRef> + '_ {
        self.slots.iter().filter_map(|s| s.performer)
    }

    /// Whether the performer already covers a slot of this song.
    pub fn features(&self, performer: PerformerRef) -> bool {
        self.slots.iter().any(|s| s.performer == Some(performer))
    }

    /// Puts `performer` in slot `slot`. Eligibility is checked by the caller.
    pub(crate) fn set_performer(&mut self, slot: usize, performer: PerformerRef) {
        self.slots[slot].performer = Some(performer);
    }

    /// Empties slot `slot`, returning whoever was there.
    pub(crate) fn clear_slot(&mut self, slot: usize) -> Option<PerformerRef> {
        self.slots[slot].performer.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_song() -> Song {
        Song::new("Somebody to Love").with_roles([
            RoleKind::LeadVocal,
            RoleKind::ElectricGuitar,
            RoleKind::BackingVocal,
            RoleKind::BackingVocal,
        ])
    }

    #[test]
    fn test_new_song_is_incomplete() {
        let song = sample_song();
        assert_eq!(song.slot_count(), 4);
        assert!(!song.is_complete());
        assert_eq!(song.open_slots(), vec![0, 1, 2, 3]);
        assert_eq!(song.demand_for(RoleKind::BackingVocal), 2);
        assert_eq!(song.demand_for(RoleKind::Drums), 0);
    }

    #[test]
    fn test_missing_roles_tracks_assignments() {
        let mut song = sample_song();
        song.set_performer(0, PerformerRef::External(0));
        song.set_performer(2, PerformerRef::Base(1));

        assert_eq!(
            song.missing_roles(),
            vec![RoleKind::ElectricGuitar, RoleKind::BackingVocal]
        );
        let counts = song.missing_role_counts();
        assert_eq!(counts[&RoleKind::BackingVocal], 1);
        assert!(!counts.contains_key(&RoleKind::LeadVocal));
        assert!(song.features(PerformerRef::Base(1)));
        assert!(!song.features(PerformerRef::Base(0)));
    }

    #[test]
    fn test_clear_slot() {
        let mut song = Song::new("Solo").with_role(RoleKind::Piano);
        song.set_performer(0, PerformerRef::External(2));
        assert!(song.is_complete());

        assert_eq!(song.clear_slot(0), Some(PerformerRef::External(2)));
        assert_eq!(song.clear_slot(0), None);
        assert!(!song.is_complete());
    }

    #[test]
    fn test_empty_song_is_complete() {
        assert!(Song::new("Intro").is_complete());
    }
}
