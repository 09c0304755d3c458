//! Training advice.
//!
//! Answers "how many trainings does this recital need at least?" from the
//! base roster's point of view: for each role, how many slots per song the
//! in-house performers cannot cover on their own. The counting itself is
//! delegated to a [`TrainingAdvisor`], so an external solver can plug in.

use std::collections::BTreeMap;

use crate::models::{Artist, Recital, RoleKind};

/// Per role (with nonzero demand), per song: slots the base roster
/// cannot cover.
pub type Shortfalls = BTreeMap<RoleKind, Vec<u32>>;

/// Computes the base-roster shortfall of every demanded role.
///
/// For role `r` and song `s` the entry is
/// `max(0, demand(s, r) - |base performers able to play r|)`. Current
/// assignments are ignored; songs are in recital order.
pub fn training_shortfalls(recital: &Recital) -> Shortfalls {
    let mut shortfalls = BTreeMap::new();
    for role in RoleKind::ALL {
        let total_demand: usize = recital.songs().iter().map(|s| s.demand_for(role)).sum();
        if total_demand == 0 {
            continue;
        }

        let base_capable = recital
            .base_roster()
            .iter()
            .filter(|p| p.can_perform(role))
            .count();
        let per_song = recital
            .songs()
            .iter()
            .map(|s| s.demand_for(role).saturating_sub(base_capable) as u32)
            .collect();
        shortfalls.insert(role, per_song);
    }
    shortfalls
}

/// Turns shortfalls into a minimum number of trainings.
pub trait TrainingAdvisor {
    fn minimum_trainings(&self, shortfalls: &Shortfalls) -> u32;
}

/// Sums, over roles, the largest single-song shortfall.
///
/// Each song is staffed separately, so one trained performer can cover the
/// same role in several songs; the worst song therefore bounds what a role
/// needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakShortfallAdvisor;

impl TrainingAdvisor for PeakShortfallAdvisor {
    fn minimum_trainings(&self, shortfalls: &Shortfalls) -> u32 {
        shortfalls
            .values()
            .map(|per_song| per_song.iter().copied().max().unwrap_or(0))
            .sum()
    }
}

/// Externals that could be trained into `role`: nothing booked yet, the
/// role not already held, and room for at least one song.
pub fn trainable_candidates(recital: &Recital, role: RoleKind) -> Vec<usize> {
    recital
        .external_pool()
        .iter()
        .enumerate()
        .filter(|(_, p)| p.songs_assigned() == 0 && !p.can_perform(role) && p.max_songs() > 0)
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BasePerformer, ExternalPerformer, PerformerRef, RecitalType, Song, SongId};

    fn band_recital() -> Recital {
        Recital::new("R", RecitalType::Rock)
            .with_base(
                BasePerformer::new("Freddie").with_roles([RoleKind::LeadVocal, RoleKind::Piano]),
            )
            .with_base(BasePerformer::new("Brian").with_role(RoleKind::ElectricGuitar))
            .with_external(ExternalPerformer::new("Drummer", 500.0, 2).with_role(RoleKind::Drums))
            .with_external(ExternalPerformer::new("Singer", 600.0, 1).with_role(RoleKind::LeadVocal))
            .with_external(ExternalPerformer::new("Retired", 100.0, 0))
            .with_song(Song::new("A").with_roles([
                RoleKind::LeadVocal,
                RoleKind::ElectricGuitar,
                RoleKind::ElectricGuitar,
                RoleKind::Drums,
            ]))
            .with_song(Song::new("B").with_roles([RoleKind::LeadVocal, RoleKind::Bass]))
    }

    #[test]
    fn test_shortfalls_per_role_per_song() {
        let shortfalls = training_shortfalls(&band_recital());

        assert_eq!(shortfalls.len(), 4);
        assert_eq!(shortfalls[&RoleKind::LeadVocal], vec![0, 0]);
        assert_eq!(shortfalls[&RoleKind::ElectricGuitar], vec![1, 0]);
        assert_eq!(shortfalls[&RoleKind::Drums], vec![1, 0]);
        assert_eq!(shortfalls[&RoleKind::Bass], vec![0, 1]);
        assert!(!shortfalls.contains_key(&RoleKind::Piano));
    }

    #[test]
    fn test_peak_advisor() {
        let shortfalls = training_shortfalls(&band_recital());
        assert_eq!(PeakShortfallAdvisor.minimum_trainings(&shortfalls), 3);
        assert_eq!(PeakShortfallAdvisor.minimum_trainings(&Shortfalls::new()), 0);
    }

    #[test]
    fn test_custom_advisor_through_trait() {
        struct Fixed(u32);
        impl TrainingAdvisor for Fixed {
            fn minimum_trainings(&self, _: &Shortfalls) -> u32 {
                self.0
            }
        }

        let advisors: Vec<Box<dyn TrainingAdvisor>> =
            vec![Box::new(Fixed(7)), Box::new(PeakShortfallAdvisor)];
        let shortfalls = training_shortfalls(&band_recital());
        let answers: Vec<u32> = advisors
            .iter()
            .map(|a| a.minimum_trainings(&shortfalls))
            .collect();
        assert_eq!(answers, vec![7, 3]);
    }

    #[test]
    fn test_trainable_candidates() {
        let mut r = band_recital();
        assert_eq!(trainable_candidates(&r, RoleKind::Bass), vec![0, 1]);
        assert_eq!(trainable_candidates(&r, RoleKind::Drums), vec![1]);

        r.assign(SongId(0), 3, PerformerRef::External(0));
        assert_eq!(trainable_candidates(&r, RoleKind::Bass), vec![1]);
        assert!(!r.can_train(0));
    }
}
