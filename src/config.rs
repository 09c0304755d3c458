//! Recital configuration.
//!
//! The input shape a config loader hands over: one flat artist list, the
//! names of the label's own artists, and the songs with their required
//! roles. Roles and recital types are plain labels here ("voz principal",
//! "Electric Guitar", "BASS", ...) and are parsed by [`RecitalConfig::build`].
//! Reading files is left to the loader.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use tracing::info;

use crate::cost::CostPolicy;
use crate::error::ConfigError;
use crate::models::{BasePerformer, ExternalPerformer, Recital, RecitalType, RoleKind, Song};
use crate::validation::validate_recital;

/// One artist as listed in the configuration.
///
/// Cost, song cap and preference only matter for externals; base
/// artists ignore them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistEntry {
    pub name: String,
    pub roles: Vec<String>,
    #[serde(default)]
    pub bands: Vec<String>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub max_songs: u32,
    /// Blank or missing means no preference.
    #[serde(default)]
    pub preferred_type: Option<String>,
}

impl ArtistEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
            bands: Vec::new(),
            cost: 0.0,
            max_songs: 0,
            preferred_type: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn with_band(mut self, band: impl Into<String>) -> Self {
        self.bands.push(band.into());
        self
    }

    /// Sets hiring terms (external artists).
    pub fn with_terms(mut self, cost: f64, max_songs: u32) -> Self {
        self.cost = cost;
        self.max_songs = max_songs;
        self
    }

    pub fn with_preferred_type(mut self, recital_type: impl Into<String>) -> Self {
        self.preferred_type = Some(recital_type.into());
        self
    }
}

/// One song as listed in the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongEntry {
    pub title: String,
    pub roles: Vec<String>,
}

impl SongEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

/// Everything needed to build a fresh recital.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecitalConfig {
    pub name: String,
    pub recital_type: String,
    pub artists: Vec<ArtistEntry>,
    /// Names of artists (from `artists`) that belong to the label.
    #[serde(default)]
    pub base_names: Vec<String>,
    pub songs: Vec<SongEntry>,
    #[serde(default)]
    pub policy: CostPolicy,
}

impl RecitalConfig {
    pub fn new(name: impl Into<String>, recital_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recital_type: recital_type.into(),
            artists: Vec::new(),
            base_names: Vec::new(),
            songs: Vec::new(),
            policy: CostPolicy::default(),
        }
    }

    pub fn with_artist(mut self, artist: ArtistEntry) -> Self {
        self.artists.push(artist);
        self
    }

    /// Marks an artist as belonging to the label.
    pub fn with_base_name(mut self, name: impl Into<String>) -> Self {
        self.base_names.push(name.into());
        self
    }

    pub fn with_song(mut self, song: SongEntry) -> Self {
        self.songs.push(song);
        self
    }

    pub fn with_policy(mut self, policy: CostPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds an unassigned recital.
    ///
    /// Artists named in `base_names` go to the base roster, the rest to the
    /// external pool, both in list order.
    ///
    /// # Errors
    /// - [`ConfigError::UnnamedRecital`] / [`ConfigError::UnnamedArtist`] for blank names
    /// - [`ConfigError::MissingBaseArtist`] if a base name has no artist entry
    /// - [`ConfigError::Role`] / [`ConfigError::RecitalType`] for unknown labels
    /// - [`ConfigError::InvalidPolicy`] for an unusable cost policy
    /// - [`ConfigError::Invalid`] if the resulting recital fails validation
    pub fn build(&self) -> Result<Recital, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::UnnamedRecital);
        }
        self.policy.validate()?;
        let recital_type: RecitalType = self.recital_type.parse()?;

        let base_names: HashSet<&str> = self.base_names.iter().map(String::as_str).collect();
        for name in &self.base_names {
            if !self.artists.iter().any(|a| &a.name == name) {
                return Err(ConfigError::MissingBaseArtist(name.clone()));
            }
        }

        let mut recital = Recital::new(self.name.trim(), recital_type).with_policy(self.policy);

        for (idx, entry) in self.artists.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(ConfigError::UnnamedArtist(idx));
            }
            let roles = parse_roles(&entry.roles)?;

            if base_names.contains(entry.name.as_str()) {
                recital = recital.with_base(
                    BasePerformer::new(entry.name.clone())
                        .with_roles(roles)
                        .with_bands(entry.bands.iter().cloned()),
                );
                continue;
            }

            let mut performer =
                ExternalPerformer::new(entry.name.clone(), entry.cost, entry.max_songs)
                    .with_roles(roles)
                    .with_bands(entry.bands.iter().cloned());
            let preferred = entry.preferred_type.as_deref().map(str::trim);
            if let Some(preferred) = preferred.filter(|t| !t.is_empty()) {
                performer = performer.with_preferred_type(preferred.parse::<RecitalType>()?);
            }
            recital = recital.with_external(performer);
        }

        for entry in &self.songs {
            let roles = parse_roles(&entry.roles)?;
            recital = recital.with_song(Song::new(entry.title.clone()).with_roles(roles));
        }

        validate_recital(&recital).map_err(ConfigError::Invalid)?;
        info!(
            recital = recital.name(),
            %recital_type,
            base = recital.base_roster().len(),
            externals = recital.external_pool().len(),
            songs = recital.songs().len(),
            "recital built from configuration"
        );
        Ok(recital)
    }
}

fn parse_roles(labels: &[String]) -> Result<Vec<RoleKind>, ConfigError> {
    labels
        .iter()
        .map(|label| label.parse::<RoleKind>().map_err(ConfigError::from))
        .collect()
}
