/// Ranks beyond this earn nothing.
pub const LAST_SCORING_RANK: u32 = 10;

/// Points for a rank: 1st → 10, 2nd → 9, ..., 10th → 1, 11th and later → 0.
pub fn points_for_rank(rank: u32) -> u32 {
    if rank == 0 || rank > LAST_SCORING_RANK {
        0
    } else {
        LAST_SCORING_RANK + 1 - rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_points_table() {
        assert_eq!(points_for_rank(1), 10);
        assert_eq!(points_for_rank(2), 9);
        assert_eq!(points_for_rank(10), 1);
        assert_eq!(points_for_rank(11), 0);
        assert_eq!(points_for_rank(1000), 0);
    }

    proptest! {
        #[test]
        fn points_match_formula(rank in 1u32..10_000) {
            let expected = (11i64 - rank as i64).max(0) as u32;
            prop_assert_eq!(points_for_rank(rank), expected);
        }
    }
}
