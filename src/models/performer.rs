//! Performer model.
//!
//! Performers are the people who cover role slots. Two kinds exist:
//!
//! - **Base** performers belong to the label: free, uncapped and immutable.
//! - **External** performers are hired per recital: they carry a cost, a cap
//!   on how many songs they can take, and can be trained into new roles.
//!
//! Both expose the same read-only capabilities through [`Artist`]. Slots
//! refer to performers through a [`PerformerRef`] handle into the recital's
//! rosters, never by ownership.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{RecitalType, RoleKind};

/// Read-only capabilities shared by every performer.
pub trait Artist {
    /// Display name (identity key within a recital).
    fn name(&self) -> &str;

    /// Roles the performer can currently play.
    fn roles(&self) -> &BTreeSet<RoleKind>;

    /// Bands the performer has played in.
    fn bands(&self) -> &BTreeSet<String>;

    /// Whether the performer can cover the given role.
    fn can_perform(&self, role: RoleKind) -> bool {
        self.roles().contains(&role)
    }

    /// Whether both performers have at least one band in common.
    fn shares_band_with(&self, other: &dyn Artist) -> bool {
        let other_bands = other.bands();
        self.bands().iter().any(|b| other_bands.contains(b))
    }
}

/// Non-owning handle to a performer inside a recital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformerRef {
    /// Index into the base roster.
    Base(usize),
    /// Index into the external pool.
    External(usize),
}

impl PerformerRef {
    /// Index of the external performer, if this handle points to one.
    pub fn external_index(&self) -> Option<usize> {
        match self {
            PerformerRef::External(idx) => Some(*idx),
            PerformerRef::Base(_) => None,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, PerformerRef::External(_))
    }
}

/// An in-house performer. Costs nothing and has no song cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePerformer {
    name: String,
    roles: BTreeSet<RoleKind>,
    bands: BTreeSet<String>,
}

impl BasePerformer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: BTreeSet::new(),
            bands: BTreeSet::new(),
        }
    }

    /// Adds a playable role.
    pub fn with_role(mut self, role: RoleKind) -> Self {
        self.roles.insert(role);
        self
    }

    /// Adds several playable roles.
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleKind>) -> Self {
        self.roles.extend(roles);
        self
    }

    /// Adds a band affiliation.
    pub fn with_band(mut self, band: impl Into<String>) -> Self {
        self.bands.insert(band.into());
        self
    }

    /// Adds several band affiliations.
    pub fn with_bands<S: Into<String>>(mut self, bands: impl IntoIterator<Item = S>) -> Self {
        self.bands.extend(bands.into_iter().map(Into::into));
        self
    }
}

impl Artist for BasePerformer {
    fn name(&self) -> &str {
        &self.name
    }

    fn roles(&self) -> &BTreeSet<RoleKind> {
        &self.roles
    }

    fn bands(&self) -> &BTreeSet<String> {
        &self.bands
    }
}

/// A hired performer.
///
/// `base_cost` already includes every training surcharge applied so far.
/// `songs_assigned` counts the songs this performer currently covers in the
/// recital and never exceeds `max_songs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalPerformer {
    name: String,
    roles: BTreeSet<RoleKind>,
    bands: BTreeSet<String>,
    base_cost: f64,
    max_songs: u32,
    songs_assigned: u32,
    trained_roles: BTreeSet<RoleKind>,
    preferred_type: Option<RecitalType>,
}

impl ExternalPerformer {
    /// Creates an external performer with no roles and no bookings.
    pub fn new(name: impl Into<String>, base_cost: f64, max_songs: u32) -> Self {
        Self {
            name: name.into(),
            roles: BTreeSet::new(),
            bands: BTreeSet::new(),
            base_cost,
            max_songs,
            songs_assigned: 0,
            trained_roles: BTreeSet::new(),
            preferred_type: None,
        }
    }

    /// Adds a playable role.
    pub fn with_role(mut self, role: RoleKind) -> Self {
        self.roles.insert(role);
        self
    }

    /// Adds several playable roles.
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleKind>) -> Self {
        self.roles.extend(roles);
        self
    }

    /// Adds a band affiliation.
    pub fn with_band(mut self, band: impl Into<String>) -> Self {
        self.bands.insert(band.into());
        self
    }

    /// Adds several band affiliations.
    pub fn with_bands<S: Into<String>>(mut self, bands: impl IntoIterator<Item = S>) -> Self {
        self.bands.extend(bands.into_iter().map(Into::into));
        self
    }

    /// Sets the recital type this performer prefers.
    pub fn with_preferred_type(mut self, recital_type: RecitalType) -> Self {
        self.preferred_type = Some(recital_type);
        self
    }

    /// Restores roles gained through earlier trainings.
    ///
    /// Only bookkeeping: `base_cost` is expected to already carry the
    /// surcharges, so it is left untouched.
    pub fn with_trained_roles(mut self, roles: impl IntoIterator<Item = RoleKind>) -> Self {
        for role in roles {
            self.roles.insert(role);
            self.trained_roles.insert(role);
        }
        self
    }

    /// Restores a stored song counter. Consistency with the slots is
    /// checked by validation, not here.
    pub(crate) fn with_songs_assigned(mut self, songs_assigned: u32) -> Self {
        self.songs_assigned = songs_assigned;
        self
    }

    pub fn base_cost(&self) -> f64 {
        self.base_cost
    }

    pub fn max_songs(&self) -> u32 {
        self.max_songs
    }

    pub fn songs_assigned(&self) -> u32 {
        self.songs_assigned
    }

    pub fn trained_roles(&self) -> &BTreeSet<RoleKind> {
        &self.trained_roles
    }

    /// Number of distinct trainings baked into `base_cost`.
    pub fn trainings_applied(&self) -> usize {
        self.trained_roles.len()
    }

    pub fn preferred_type(&self) -> Option<RecitalType> {
        self.preferred_type
    }

    /// Whether another song fits under the cap.
    pub fn has_capacity(&self) -> bool {
        self.songs_assigned < self.max_songs
    }

    /// Songs still available under the cap.
    pub fn remaining_capacity(&self) -> u32 {
        self.max_songs.saturating_sub(self.songs_assigned)
    }

    /// Records one more song for this performer.
    ///
    /// # Panics
    /// If the performer is already at `max_songs`.
    pub(crate) fn register_song(&mut self) {
        assert!(
            self.has_capacity(),
            "performer '{}' already reached its limit of {} songs",
            self.name,
            self.max_songs
        );
        self.songs_assigned += 1;
    }

    /// Releases one song.
    ///
    /// # Panics
    /// If the performer has no songs booked.
    pub(crate) fn release_song(&mut self) {
        assert!(
            self.songs_assigned > 0,
            "performer '{}' has no songs to release",
            self.name
        );
        self.songs_assigned -= 1;
    }

    /// Adds `role`, multiplying `base_cost` by `factor` once.
    ///
    /// Returns `false` (and changes nothing) if the role is already held.
    pub(crate) fn learn_role(&mut self, role: RoleKind, factor: f64) -> bool {
        if !self.roles.insert(role) {
            return false;
        }
        self.trained_roles.insert(role);
        self.base_cost *= factor;
        true
    }
}

impl Artist for ExternalPerformer {
    fn name(&self) -> &str {
        &self.name
    }

    fn roles(&self) -> &BTreeSet<RoleKind> {
        &self.roles
    }

    fn bands(&self) -> &BTreeSet<String> {
        &self.bands
    }
}
