//! Staffing status report.
//!
//! A read-only summary of where a recital stands.
//!
//! | Item | Definition |
//! |------|-----------|
//! | Song status | complete flag, cost and missing roles per song |
//! | Completion rate | complete songs / songs |
//! | Contracted externals | externals covering at least one slot, first appearance order |
//! | Missing roles | uncovered slots per role, across songs |
//! | Cost | the full [`CostBreakdown`] |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cost::CostBreakdown;
use crate::models::{Artist, Recital, RoleKind, SongId};

/// State of one song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongStatus {
    pub song: SongId,
    pub title: String,
    pub complete: bool,
    /// Billed cost of the song's externals.
    pub cost: f64,
    /// Roles of uncovered slots, in slot order.
    pub missing_roles: Vec<RoleKind>,
}

/// A hired performer and what it costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractedExternal {
    /// Index into the external pool.
    pub external: usize,
    pub name: String,
    pub songs: u32,
    /// Per-song price (band discount applied).
    pub unit_cost: f64,
}

/// Recital status summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffingReport {
    pub recital: String,
    pub songs: Vec<SongStatus>,
    pub complete_songs: usize,
    pub contracted: Vec<ContractedExternal>,
    /// Uncovered slots per role, across every song.
    pub missing_roles: BTreeMap<RoleKind, u32>,
    pub cost: CostBreakdown,
}

impl StaffingReport {
    /// Builds the report from the recital's current assignments.
    pub fn calculate(recital: &Recital) -> Self {
        let songs: Vec<SongStatus> = recital
            .song_ids()
            .map(|id| {
                let song = recital.song(id);
                SongStatus {
                    song: id,
                    title: song.title.clone(),
                    complete: song.is_complete(),
                    cost: recital.song_cost(id),
                    missing_roles: song.missing_roles(),
                }
            })
            .collect();
        let complete_songs = songs.iter().filter(|s| s.complete).count();

        let contracted = recital
            .contracted_externals()
            .into_iter()
            .map(|idx| {
                let p = recital.external(idx);
                ContractedExternal {
                    external: idx,
                    name: p.name().to_string(),
                    songs: p.songs_assigned(),
                    unit_cost: recital.unit_cost(idx),
                }
            })
            .collect();

        Self {
            recital: recital.name().to_string(),
            songs,
            complete_songs,
            contracted,
            missing_roles: recital.missing_roles(),
            cost: recital.cost_breakdown(),
        }
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    /// Fraction of complete songs (1.0 for a recital without songs).
    pub fn completion_rate(&self) -> f64 {
        if self.songs.is_empty() {
            1.0
        } else {
            self.complete_songs as f64 / self.songs.len() as f64
        }
    }

    /// Whether every slot is covered.
    pub fn is_fully_staffed(&self) -> bool {
        self.complete_songs == self.songs.len()
    }

    /// Whether the recital is fully staffed within `budget`.
    pub fn meets_budget(&self, budget: f64) -> bool {
        self.is_fully_staffed() && self.cost.total <= budget
    }
}
