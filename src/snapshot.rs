//! Recital state snapshots.
//!
//! The shape a state store persists: every performer with its mutable
//! bookkeeping, and every slot with the *name* of whoever covers it. This
//! module only converts between [`Recital`] and that shape; reading and
//! writing it somewhere is the store's job.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use tracing::debug;

use crate::cost::CostPolicy;
use crate::error::SnapshotError;
use crate::models::{
    Artist, BasePerformer, ExternalPerformer, PerformerRef, Recital, RecitalType, RoleKind, Song,
    SongId,
};
use crate::validation::validate_recital;

/// Full state of a recital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecitalSnapshot {
    pub name: String,
    pub recital_type: RecitalType,
    pub base: Vec<BaseSnapshot>,
    pub externals: Vec<ExternalSnapshot>,
    pub songs: Vec<SongSnapshot>,
    /// Missing in older states; those were priced with the default.
    #[serde(default)]
    pub policy: CostPolicy,
    /// Derived, stored for listings.
    pub total_cost: f64,
    /// Derived, stored for listings.
    pub song_count: usize,
    /// Derived, stored for listings.
    pub complete_songs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSnapshot {
    pub name: String,
    pub roles: BTreeSet<RoleKind>,
    pub bands: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalSnapshot {
    pub name: String,
    /// Every playable role, trained ones included.
    pub roles: BTreeSet<RoleKind>,
    #[serde(default)]
    pub trained_roles: BTreeSet<RoleKind>,
    pub bands: BTreeSet<String>,
    /// Current cost, surcharges included.
    pub base_cost: f64,
    pub max_songs: u32,
    pub songs_assigned: u32,
    #[serde(default)]
    pub preferred_type: Option<RecitalType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongSnapshot {
    pub title: String,
    pub slots: Vec<SlotSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub role: RoleKind,
    /// Name of the covering performer.
    #[serde(default)]
    pub performer: Option<String>,
}

/// One line of a listing of stored states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    /// Name the state was stored under.
    pub logical_name: String,
    pub recital_name: String,
    pub recital_type: RecitalType,
    pub song_count: usize,
    pub complete_songs: usize,
    pub total_cost: f64,
}

impl RecitalSnapshot {
    /// Listing line for this snapshot stored under `logical_name`.
    pub fn summary(&self, logical_name: impl Into<String>) -> SnapshotSummary {
        SnapshotSummary {
            logical_name: logical_name.into(),
            recital_name: self.name.clone(),
            recital_type: self.recital_type,
            song_count: self.song_count,
            complete_songs: self.complete_songs,
            total_cost: self.total_cost,
        }
    }
}

impl Recital {
    /// Captures the full state.
    pub fn snapshot(&self) -> RecitalSnapshot {
        let base = self
            .base_roster()
            .iter()
            .map(|p| BaseSnapshot {
                name: p.name().to_string(),
                roles: p.roles().clone(),
                bands: p.bands().clone(),
            })
            .collect();

        let externals = self
            .external_pool()
            .iter()
            .map(|p| ExternalSnapshot {
                name: p.name().to_string(),
                roles: p.roles().clone(),
                trained_roles: p.trained_roles().clone(),
                bands: p.bands().clone(),
                base_cost: p.base_cost(),
                max_songs: p.max_songs(),
                songs_assigned: p.songs_assigned(),
                preferred_type: p.preferred_type(),
            })
            .collect();

        let songs = self
            .songs()
            .iter()
            .map(|s| SongSnapshot {
                title: s.title.clone(),
                slots: s
                    .slots()
                    .iter()
                    .map(|slot| SlotSnapshot {
                        role: slot.role,
                        performer: slot
                            .performer()
                            .map(|p| self.performer_name(p).to_string()),
                    })
                    .collect(),
            })
            .collect();

        RecitalSnapshot {
            name: self.name().to_string(),
            recital_type: self.recital_type(),
            base,
            externals,
            songs,
            policy: *self.policy(),
            total_cost: self.total_cost(),
            song_count: self.songs().len(),
            complete_songs: self.complete_song_count(),
        }
    }

    /// Rebuilds a recital from a snapshot.
    ///
    /// Slot performers are resolved by name and counters are restored as
    /// stored; the result is then validated as a whole. The derived fields
    /// (`total_cost`, counts) are ignored.
    ///
    /// # Errors
    /// - [`SnapshotError::Policy`] if the stored cost policy is unusable
    /// - [`SnapshotError::UnknownPerformer`] for a slot naming nobody in the rosters
    /// - [`SnapshotError::Invalid`] with every inconsistency found otherwise
    pub fn from_snapshot(snapshot: &RecitalSnapshot) -> Result<Recital, SnapshotError> {
        snapshot.policy.validate().map_err(SnapshotError::Policy)?;
        let mut recital = Recital::new(snapshot.name.clone(), snapshot.recital_type)
            .with_policy(snapshot.policy);

        for b in &snapshot.base {
            recital = recital.with_base(
                BasePerformer::new(b.name.clone())
                    .with_roles(b.roles.iter().copied())
                    .with_bands(b.bands.iter().cloned()),
            );
        }

        for e in &snapshot.externals {
            let mut performer = ExternalPerformer::new(e.name.clone(), e.base_cost, e.max_songs)
                .with_roles(e.roles.iter().copied())
                .with_trained_roles(e.trained_roles.iter().copied())
                .with_bands(e.bands.iter().cloned())
                .with_songs_assigned(e.songs_assigned);
            if let Some(preferred) = e.preferred_type {
                performer = performer.with_preferred_type(preferred);
            }
            recital = recital.with_external(performer);
        }

        for (song_idx, s) in snapshot.songs.iter().enumerate() {
            let song = Song::new(s.title.clone()).with_roles(s.slots.iter().map(|slot| slot.role));
            recital = recital.with_song(song);

            for (slot_idx, slot) in s.slots.iter().enumerate() {
                let Some(name) = &slot.performer else {
                    continue;
                };
                let performer: PerformerRef = recital.find_performer(name).ok_or_else(|| {
                    SnapshotError::UnknownPerformer {
                        song: s.title.clone(),
                        performer: name.clone(),
                    }
                })?;
                recital
                    .song_mut(SongId(song_idx))
                    .set_performer(slot_idx, performer);
            }
        }

        validate_recital(&recital).map_err(SnapshotError::Invalid)?;
        debug!(
            recital = recital.name(),
            songs = recital.songs().len(),
            "recital restored from snapshot"
        );
        Ok(recital)
    }
}

impl TryFrom<RecitalSnapshot> for Recital {
    type Error = SnapshotError;

    fn try_from(snapshot: RecitalSnapshot) -> Result<Self, Self::Error> {
        Recital::from_snapshot(&snapshot)
    }
}

impl From<Recital> for RecitalSnapshot {
    fn from(recital: Recital) -> Self {
        recital.snapshot()
    }
}
