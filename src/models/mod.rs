//! Recital staffing domain models.
//!
//! Core data types for describing a recital and its staffing state.
//!
//! # Domain Mappings
//!
//! | recital-staffing | Scheduling analogue |
//! |------------------|---------------------|
//! | Song | Task |
//! | RoleSlot | Activity requirement |
//! | BasePerformer | Owned, uncapped resource |
//! | ExternalPerformer | Hired, capacity-limited resource |
//! | Recital | Schedule |

mod performer;
mod recital;
mod role;
mod song;

pub use performer::{Artist, BasePerformer, ExternalPerformer, PerformerRef};
pub use recital::Recital;
pub use role::{RecitalType, RoleKind};
pub use song::{RoleSlot, Song, SongId};
