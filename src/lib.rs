//! Recital staffing engine.
//!
//! Staffs the songs of a recital with performers: the label's own (base)
//! artists for free, hired (external) artists at a price. Prices follow a
//! small set of cost rules (training surcharges, band discounts, a star
//! rebate) and two planners decide who plays what.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Recital`, `Song`, `RoleSlot`, `BasePerformer`,
//!   `ExternalPerformer`, `RoleKind`, `RecitalType`
//! - **`cost`**: Unit, song and recital cost rules, `CostPolicy`
//! - **`planner`**: `GreedyFiller` (per song) and `BacktrackingOptimizer` (whole recital)
//! - **`advisor`**: Base-roster shortfalls and the training-count seam
//! - **`report`**: `StaffingReport` status summary
//! - **`snapshot`**: Full-state shape for persistence and its rebuild path
//! - **`config`**: Input shape for building a fresh recital
//! - **`validation`**: Consistency checks (names, counters, capacities, roles)
//! - **`error`**: Recoverable error types
//!
//! # Example
//!
//! ```
//! use recital_staffing::models::{BasePerformer, ExternalPerformer, Recital, RecitalType, RoleKind, Song};
//! use recital_staffing::planner::GreedyFiller;
//! use recital_staffing::report::StaffingReport;
//!
//! let mut recital = Recital::new("Queen Tribute", RecitalType::Rock)
//!     .with_base(
//!         BasePerformer::new("Brian May")
//!             .with_role(RoleKind::ElectricGuitar)
//!             .with_band("Queen"),
//!     )
//!     .with_external(
//!         ExternalPerformer::new("George Michael", 1000.0, 2)
//!             .with_role(RoleKind::LeadVocal)
//!             .with_band("Queen"),
//!     )
//!     .with_song(Song::new("Somebody to Love").with_roles([RoleKind::LeadVocal, RoleKind::ElectricGuitar]));
//!
//! GreedyFiller::new().fill_recital(&mut recital).unwrap();
//!
//! let report = StaffingReport::calculate(&recital);
//! assert!(report.is_fully_staffed());
//! // Shares a band with the roster: half price
//! assert!((report.cost.total - 500.0).abs() < 1e-10);
//! ```
//!
//! # Concurrency
//!
//! Everything is synchronous. Mutating operations take `&mut Recital`, so a
//! recital is never observed half-updated.

pub mod advisor;
pub mod config;
pub mod cost;
pub mod error;
pub mod models;
pub mod planner;
pub mod report;
pub mod snapshot;
pub mod validation;

pub use error::{StaffingError, StaffingResult};
