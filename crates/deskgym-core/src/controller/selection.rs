use std::collections::VecDeque;

use rand::Rng;

/// How many recent picks are excluded from the next selection.
pub const RECENT_MEMORY: usize = 2;

/// Uniform exercise picker that avoids the last two picks.
#[derive(Debug, Clone, Default)]
pub struct ExercisePicker {
    recent: VecDeque<usize>,
}

impl ExercisePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent last.
    pub fn recent(&self) -> impl Iterator<Item = usize> + '_ {
        self.recent.iter().copied()
    }

    /// Pick an index in `0..len`, or `None` for an empty roster.
    ///
    /// Candidates are the indices not picked recently; when that leaves
    /// nothing (rosters of two or fewer) the whole roster is eligible.
    pub fn pick<R: Rng + ?Sized>(&mut self, len: usize, rng: &mut R) -> Option<usize> {
        if len == 0 {
            return None;
        }

        let mut candidates: Vec<usize> = (0..len).filter(|i| !self.recent.contains(i)).collect();
        if candidates.is_empty() {
            candidates = (0..len).collect();
        }

        let index = candidates[rng.gen_range(0..candidates.len())];
        self.recent.push_back(index);
        while self.recent.len() > RECENT_MEMORY {
            self.recent.pop_front();
        }
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    #[test]
    fn empty_roster_picks_nothing() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        assert_eq!(ExercisePicker::new().pick(0, &mut rng), None);
    }

    #[test]
    fn never_repeats_the_last_two() {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let mut picker = ExercisePicker::new();
        let picks: Vec<usize> = (0..200).filter_map(|_| picker.pick(5, &mut rng)).collect();
        for window in picks.windows(3) {
            assert_ne!(window[2], window[1]);
            assert_ne!(window[2], window[0]);
        }
        assert!(picker.recent().count() <= RECENT_MEMORY);
    }

    #[test]
    fn three_exercises_cycle_in_a_fixed_order() {
        let mut rng = Mcg128Xsl64::seed_from_u64(3);
        let mut picker = ExercisePicker::new();
        let picks: Vec<usize> = (0..9).filter_map(|_| picker.pick(3, &mut rng)).collect();
        // Once two are remembered only one candidate is left.
        for i in 3..picks.len() {
            assert_eq!(picks[i], picks[i - 3]);
        }
    }

    #[test]
    fn small_rosters_fall_back_to_everything() {
        let mut rng = Mcg128Xsl64::seed_from_u64(11);
        let mut picker = ExercisePicker::new();
        for _ in 0..20 {
            assert_eq!(picker.pick(1, &mut rng), Some(0));
        }

        let mut picker = ExercisePicker::new();
        for _ in 0..20 {
            assert!(picker.pick(2, &mut rng).is_some_and(|i| i < 2));
        }
    }
}
