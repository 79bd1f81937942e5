//! Property-based coverage of the algebraic invariants in spec.md §8,
//! items 2 and 5. Style follows the teacher's
//! `proptest_proj_simple.rs`: small generators, one property per test.

use proptest::prelude::*;

use mpst_core::{is_linear, project, GlobalType, Prefix};

/// A chain `A0 -> A1 -> ... -> An` over `n` distinct channels: every
/// prefix uses a fresh channel, so no two steps can possibly conflict on
/// `II`/`IO`/`OO` and the chain is always linear.
fn chain_of_distinct_channels(len: usize) -> GlobalType {
    let mut gt = GlobalType::End;
    for i in (0..len).rev() {
        let prefix = Prefix::new(format!("P{i}"), format!("P{}", i + 1), format!("ch{i}"));
        gt = GlobalType::value(prefix, "int", gt);
    }
    gt
}

proptest! {
    #[test]
    fn a_chain_of_distinct_channels_is_always_linear(len in 0usize..12) {
        let gt = chain_of_distinct_channels(len);
        prop_assert!(is_linear(&gt));
    }

    #[test]
    fn project_is_deterministic(len in 1usize..8, pick in 0usize..8) {
        let gt = chain_of_distinct_channels(len);
        let participant = format!("P{}", pick % (len + 1));
        let first = project(&gt, &participant.as_str().into());
        let second = project(&gt, &participant.as_str().into());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn substitution_is_a_no_op_when_the_name_never_occurs(len in 0usize..8) {
        let gt = chain_of_distinct_channels(len);
        let replacement = GlobalType::End;
        let substituted = gt.substitute(&"never_bound".into(), &replacement);
        prop_assert_eq!(substituted, gt);
    }
}
