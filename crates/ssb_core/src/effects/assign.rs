//! Random partition of segment keys into effect groups.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{Effect, EffectCounts, SegmentKey};

/// Pairwise-disjoint zoom, pan and shake groups for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectAssignment {
    /// What the caller asked for, before capping.
    pub requested: EffectCounts,
    pub zoom: BTreeSet<SegmentKey>,
    pub pan: BTreeSet<SegmentKey>,
    pub shake: BTreeSet<SegmentKey>,
}

impl EffectAssignment {
    /// The effect selected for `key`, or [`Effect::None`].
    pub fn effect_for(&self, key: &SegmentKey) -> Effect {
        if self.zoom.contains(key) {
            Effect::Zoom
        } else if self.pan.contains(key) {
            Effect::Pan
        } else if self.shake.contains(key) {
            Effect::Shake
        } else {
            Effect::None
        }
    }

    /// Group sizes actually assigned.
    pub fn assigned(&self) -> EffectCounts {
        EffectCounts::new(self.zoom.len(), self.pan.len(), self.shake.len())
    }

    /// Whether any group got fewer keys than requested.
    pub fn was_capped(&self) -> bool {
        self.assigned() != self.requested
    }
}

/// Shuffle `keys` and slice the permutation into effect groups.
///
/// The first `counts.zoom` keys go to zoom, the next `counts.pan` to pan,
/// the next `counts.shake` to shake. Groups that run past the end of the
/// permutation are silently truncated.
pub fn assign_effects<R>(keys: &[SegmentKey], counts: EffectCounts, rng: &mut R) -> EffectAssignment
where
    R: Rng + ?Sized,
{
    let mut shuffled: Vec<&SegmentKey> = keys.iter().collect();
    shuffled.shuffle(rng);

    let mut remaining = shuffled.into_iter();
    let mut take = |n: usize| -> BTreeSet<SegmentKey> {
        remaining.by_ref().take(n).cloned().collect()
    };

    let zoom = take(counts.zoom);
    let pan = take(counts.pan);
    let shake = take(counts.shake);

    EffectAssignment {
        requested: counts,
        zoom,
        pan,
        shake,
    }
}

/// Random source for a run: seeded when reproducibility is wanted.
pub fn run_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(values: &[&str]) -> Vec<SegmentKey> {
        values.iter().map(|v| SegmentKey::parse(*v).unwrap()).collect()
    }

    fn assert_disjoint(a: &EffectAssignment) {
        assert!(a.zoom.is_disjoint(&a.pan));
        assert!(a.zoom.is_disjoint(&a.shake));
        assert!(a.pan.is_disjoint(&a.shake));
    }

    #[test]
    fn one_of_each_uses_every_key() {
        let all = keys(&["1", "2", "3"]);
        let mut rng = run_rng(Some(7));
        let a = assign_effects(&all, EffectCounts::new(1, 1, 1), &mut rng);

        assert_eq!(a.assigned(), EffectCounts::new(1, 1, 1));
        assert_disjoint(&a);
        for key in &all {
            assert_ne!(a.effect_for(key), Effect::None);
        }
        assert!(!a.was_capped());
    }

    #[test]
    fn over_request_is_capped() {
        let all = keys(&["1", "2"]);
        let mut rng = run_rng(None);
        let a = assign_effects(&all, EffectCounts::new(5, 0, 0), &mut rng);

        assert_eq!(a.zoom.len(), 2);
        assert!(a.pan.is_empty());
        assert!(a.shake.is_empty());
        assert!(a.was_capped());
    }

    #[test]
    fn later_groups_get_the_remainder() {
        let all = keys(&["1", "2", "3", "4", "5"]);
        let mut rng = run_rng(None);
        let a = assign_effects(&all, EffectCounts::new(2, 2, 2), &mut rng);

        assert_eq!(a.assigned(), EffectCounts::new(2, 2, 1));
        assert_disjoint(&a);
    }

    #[test]
    fn group_sizes_follow_min_rule_for_many_shapes() {
        let all = keys(&["1", "2", "3", "4", "5", "6", "7"]);
        for (z, p, s) in [(0, 0, 0), (3, 3, 3), (7, 1, 1), (0, 9, 2), (1, 0, 10)] {
            let mut rng = run_rng(None);
            let a = assign_effects(&all, EffectCounts::new(z, p, s), &mut rng);

            let mut remaining = all.len();
            for (requested, got) in [(z, a.zoom.len()), (p, a.pan.len()), (s, a.shake.len())] {
                assert_eq!(got, requested.min(remaining));
                remaining -= got;
            }
            assert_disjoint(&a);
        }
    }

    #[test]
    fn unassigned_keys_get_no_effect() {
        let all = keys(&["1", "2", "3", "4"]);
        let mut rng = run_rng(Some(1));
        let a = assign_effects(&all, EffectCounts::new(1, 0, 0), &mut rng);

        let none_count = all
            .iter()
            .filter(|k| a.effect_for(k) == Effect::None)
            .count();
        assert_eq!(none_count, 3);
    }

    #[test]
    fn same_seed_same_assignment() {
        let all = keys(&["1", "2", "3", "4", "5", "6"]);
        let counts = EffectCounts::new(2, 2, 1);

        let a = assign_effects(&all, counts, &mut run_rng(Some(42)));
        let b = assign_effects(&all, counts, &mut run_rng(Some(42)));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_key_list() {
        let a = assign_effects(&[], EffectCounts::new(1, 1, 1), &mut run_rng(None));
        assert_eq!(a.assigned(), EffectCounts::default());
    }
}
