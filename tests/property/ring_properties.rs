//! Property-based tests for ring stepping

use proptest::prelude::*;
use winring::types::ring_step;

proptest! {
    #[test]
    fn test_step_stays_in_range(len in 1usize..64, index in 0usize..64, offset in -200isize..200) {
        let index = index % len;
        prop_assert!(ring_step(index, offset, len) < len);
    }

    #[test]
    fn test_next_then_previous_returns(len in 1usize..64, index in 0usize..64) {
        let index = index % len;
        let next = ring_step(index, 1, len);
        prop_assert_eq!(ring_step(next, -1, len), index);
    }

    #[test]
    fn test_full_lap_returns_to_start(len in 1usize..64, index in 0usize..64) {
        let index = index % len;
        let mut at = index;
        for _ in 0..len {
            at = ring_step(at, 1, len);
        }
        prop_assert_eq!(at, index);
    }
}
