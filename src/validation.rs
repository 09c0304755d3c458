//! Consistency checks for a recital.
//!
//! Used when a recital is rebuilt from outside data (snapshots, config
//! entries). Detects:
//! - Duplicate performer names (names are identity keys)
//! - Invalid costs
//! - Song counters above the cap or out of sync with the slots
//! - Slots covered by someone who cannot play the role
//! - The same performer twice in one song
//! - Songs without slots

use crate::models::{Artist, PerformerRef, Recital};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two performers share the same name.
    DuplicateName,
    /// An external has a negative or non-finite cost.
    InvalidCost,
    /// An external is booked for more songs than its cap.
    CapacityExceeded,
    /// An external's song counter differs from the slots it covers.
    CounterMismatch,
    /// A slot is covered by a performer who cannot play its role.
    RoleMismatch,
    /// A performer covers two slots of the same song.
    DuplicateInSong,
    /// A song requires no roles.
    EmptySong,
    /// A slot points outside both rosters.
    UnknownPerformer,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a recital's rosters and assignments.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_recital(recital: &Recital) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    let all_names = recital
        .base_roster()
        .iter()
        .map(|p| p.name())
        .chain(recital.external_pool().iter().map(|p| p.name()));
    for name in all_names {
        if !names.insert(name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate performer name: {name}"),
            ));
        }
    }

    for p in recital.external_pool() {
        if !p.base_cost().is_finite() || p.base_cost() < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCost,
                format!("Performer '{}' has invalid cost {}", p.name(), p.base_cost()),
            ));
        }
        if p.songs_assigned() > p.max_songs() {
            errors.push(ValidationError::new(
                ValidationErrorKind::CapacityExceeded,
                format!(
                    "Performer '{}' is booked for {} songs but accepts at most {}",
                    p.name(),
                    p.songs_assigned(),
                    p.max_songs()
                ),
            ));
        }
    }

    let mut held: HashMap<usize, u32> = HashMap::new();
    for song in recital.songs() {
        if song.slot_count() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySong,
                format!("Song '{}' requires no roles", song.title),
            ));
        }

        let mut seen = HashSet::new();
        for slot in song.slots() {
            let Some(performer) = slot.performer() else {
                continue;
            };
            if !recital.has_performer(performer) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPerformer,
                    format!("Song '{}' references missing performer {performer:?}", song.title),
                ));
                continue;
            }
            let name = recital.performer_name(performer);

            if !recital.performer(performer).can_perform(slot.role) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::RoleMismatch,
                    format!(
                        "Performer '{name}' cannot play {} in song '{}'",
                        slot.role, song.title
                    ),
                ));
            }
            if !seen.insert(performer) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateInSong,
                    format!("Performer '{name}' appears twice in song '{}'", song.title),
                ));
            }
            if let PerformerRef::External(idx) = performer {
                *held.entry(idx).or_insert(0) += 1;
            }
        }
    }

    for (idx, p) in recital.external_pool().iter().enumerate() {
        let slots = held.get(&idx).copied().unwrap_or(0);
        if slots != p.songs_assigned() {
            errors.push(ValidationError::new(
                ValidationErrorKind::CounterMismatch,
                format!(
                    "Performer '{}' counts {} songs but covers {} slots",
                    p.name(),
                    p.songs_assigned(),
                    slots
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BasePerformer, ExternalPerformer, RecitalType, RoleKind, Song, SongId};

    fn sample_recital() -> Recital {
        Recital::new("R", RecitalType::Rock)
            .with_base(BasePerformer::new("Brian May").with_role(RoleKind::ElectricGuitar))
            .with_external(ExternalPerformer::new("Singer", 900.0, 2).with_role(RoleKind::LeadVocal))
            .with_song(Song::new("A").with_roles([RoleKind::LeadVocal, RoleKind::ElectricGuitar]))
    }

    #[test]
    fn test_valid_recital() {
        let mut r = sample_recital();
        assert!(validate_recital(&r).is_ok());

        r.assign(SongId(0), 0, PerformerRef::External(0));
        r.assign(SongId(0), 1, PerformerRef::Base(0));
        assert!(validate_recital(&r).is_ok());
    }

    #[test]
    fn test_duplicate_name_across_rosters() {
        let r = sample_recital()
            .with_external(ExternalPerformer::new("Brian May", 10.0, 1));

        let errors = validate_recital(&r).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateName && e.message.contains("Brian May")));
    }

    #[test]
    fn test_invalid_cost() {
        let r = sample_recital().with_external(ExternalPerformer::new("Free?", -5.0, 1));

        let errors = validate_recital(&r).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidCost));
    }

    #[test]
    fn test_empty_song() {
        let r = sample_recital().with_song(Song::new("Silence"));

        let errors = validate_recital(&r).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::EmptySong));
    }

    #[test]
    fn test_counter_mismatch_after_raw_slot_edit() {
        let mut r = sample_recital();
        r.assign(SongId(0), 0, PerformerRef::External(0));
        // Bypass the recital so the counter stays at 1
        r.song_mut(SongId(0)).clear_slot(0);

        let errors = validate_recital(&r).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CounterMismatch));
    }

    #[test]
    fn test_role_mismatch_and_duplicate_in_song() {
        let mut r = sample_recital();
        r.song_mut(SongId(0)).set_performer(0, PerformerRef::Base(0));
        r.song_mut(SongId(0)).set_performer(1, PerformerRef::Base(0));

        let errors = validate_recital(&r).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::RoleMismatch));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateInSong));
    }

    #[test]
    fn test_dangling_handle_reported() {
        let mut r = sample_recital();
        r.song_mut(SongId(0)).set_performer(0, PerformerRef::External(7));
        r.song_mut(SongId(0)).set_performer(1, PerformerRef::Base(3));

        let errors = validate_recital(&r).unwrap_err();
        let dangling = errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::UnknownPerformer)
            .count();
        assert_eq!(dangling, 2);
        assert!(errors.iter().any(|e| e.message.contains("External(7)")));
    }
}
