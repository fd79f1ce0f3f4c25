//! Winner selection: priority numbers first, then a uniform draw from the
//! remaining pool.

use std::collections::BTreeSet;

use rand::Rng;

use crate::pool::{nth_available, pool_size};
use crate::DrawRange;

/// Priority numbers that can still be drawn, in configured order.
///
/// Entries outside `range` are inert and never returned.
pub fn available_priority(
    range: DrawRange,
    drawn: &BTreeSet<i64>,
    priority_list: &[i64],
) -> Vec<i64> {
    priority_list
        .iter()
        .copied()
        .filter(|number| range.contains(*number) && !drawn.contains(number))
        .collect()
}

/// Whether at least one number can be selected under the given inputs.
pub fn has_selectable(range: DrawRange, drawn: &BTreeSet<i64>, priority_list: &[i64]) -> bool {
    first_priority(range, drawn, priority_list).is_some() || pool_size(range, drawn) > 0
}

/// Picks the next winner, or `None` once the range is exhausted.
///
/// The first available priority number always wins. Otherwise every
/// remaining number in the range is equally likely.
pub fn select_winner<R: Rng>(
    range: DrawRange,
    drawn: &BTreeSet<i64>,
    priority_list: &[i64],
    rng: &mut R,
) -> Option<i64> {
    if let Some(number) = first_priority(range, drawn, priority_list) {
        return Some(number);
    }

    let size = pool_size(range, drawn);
    if size == 0 {
        return None;
    }

    let rank = rng.gen_range(0..size);
    nth_available(range, drawn, rank)
}

fn first_priority(range: DrawRange, drawn: &BTreeSet<i64>, priority_list: &[i64]) -> Option<i64> {
    priority_list
        .iter()
        .copied()
        .find(|number| range.contains(*number) && !drawn.contains(number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn range(min: i64, max: i64) -> DrawRange {
        DrawRange::new(min, max).unwrap()
    }

    #[test]
    fn skips_drawn_priority_numbers() {
        let drawn: BTreeSet<i64> = [5].into_iter().collect();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let winner = select_winner(range(1, 100), &drawn, &[5, 9], &mut rng);
            assert_eq!(winner, Some(9));
        }
    }

    #[test]
    fn priority_order_is_preserved() {
        let drawn: BTreeSet<i64> = [3].into_iter().collect();
        assert_eq!(
            available_priority(range(1, 10), &drawn, &[8, 3, 2, 8, 42]),
            vec![8, 2, 8]
        );
    }

    #[test]
    fn out_of_range_priorities_are_inert() {
        let mut rng = StdRng::seed_from_u64(7);
        let drawn: BTreeSet<i64> = [1, 2].into_iter().collect();

        assert_eq!(select_winner(range(1, 3), &drawn, &[50, 0], &mut rng), Some(3));

        let all: BTreeSet<i64> = [1, 2, 3].into_iter().collect();
        assert!(!has_selectable(range(1, 3), &all, &[50]));
        assert_eq!(select_winner(range(1, 3), &all, &[50], &mut rng), None);
    }

    #[test]
    fn draws_without_repeats_until_exhausted() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut drawn = BTreeSet::new();

        for _ in 0..25 {
            let winner = select_winner(range(10, 34), &drawn, &[], &mut rng).unwrap();
            assert!(drawn.insert(winner), "{winner} was drawn twice");
        }

        assert_eq!(drawn.len(), 25);
        assert_eq!(select_winner(range(10, 34), &drawn, &[], &mut rng), None);
    }

    #[test]
    fn random_fallback_reaches_every_number() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = BTreeSet::new();
        for _ in 0..500 {
            seen.extend(select_winner(range(1, 6), &BTreeSet::new(), &[], &mut rng));
        }
        assert_eq!(seen, (1..=6).collect::<BTreeSet<i64>>());
    }

    proptest! {
        #[test]
        fn empty_history_yields_number_in_range(
            min in -1_000i64..1_000,
            span in 0i64..500,
            seed in any::<u64>(),
        ) {
            let max = min + span;
            let mut rng = StdRng::seed_from_u64(seed);
            let winner = select_winner(range(min, max), &BTreeSet::new(), &[], &mut rng);
            let winner = winner.expect("a fresh range always has a winner");
            prop_assert!((min..=max).contains(&winner));
        }

        #[test]
        fn full_history_yields_none(min in -1_000i64..1_000, span in 0i64..200, seed in any::<u64>()) {
            let max = min + span;
            let drawn: BTreeSet<i64> = (min..=max).collect();
            let mut rng = StdRng::seed_from_u64(seed);
            prop_assert_eq!(select_winner(range(min, max), &drawn, &[], &mut rng), None);
            prop_assert!(!has_selectable(range(min, max), &drawn, &[]));
        }

        #[test]
        fn winner_is_never_already_drawn(
            taken in proptest::collection::btree_set(0i64..50, 0..49),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let winner = select_winner(range(0, 49), &taken, &[], &mut rng).unwrap();
            prop_assert!(!taken.contains(&winner));
        }
    }
}
