//! Property-based tests for test ordering
//!
//! These tests use proptest to check that the execution order is a total order on (clamped order, display name)
//! that does not depend on declaration order.

use proptest::prelude::*;
use trialrun::runner::{OrderKey, collect, execution_sequence, order_tests, resolve_order};
use trialrun::{GroupDecl, Tag};

#[derive(Default)]
struct Group;

/// Explicit and inline order per test, both optional and deliberately outside `[0, 10]` at times.
fn orders_strategy() -> impl Strategy<Value = Vec<(Option<i32>, Option<i32>, bool)>> {
    prop::collection::vec(
        (
            prop::option::of(-20i32..30),
            prop::option::of(-20i32..30),
            any::<bool>(),
        ),
        0..12,
    )
}

fn build(orders: &[(Option<i32>, Option<i32>, bool)], reversed: bool) -> GroupDecl<Group> {
    let mut indexed: Vec<_> = orders.iter().enumerate().collect();
    if reversed {
        indexed.reverse();
    }

    let mut decl = GroupDecl::<Group>::new("Group").factory_default();
    for (i, (explicit, inline, disabled)) in indexed {
        let mut tags = vec![match inline {
            Some(order) => Tag::test_in_order(*order),
            None => Tag::test(),
        }];
        if let Some(value) = explicit {
            tags.push(Tag::order(*value));
        }
        if *disabled {
            tags.push(Tag::Disabled);
        }
        decl = decl.instance_unit(format!("t{:02}", i), tags, |_: &mut Group| ());
    }
    decl
}

proptest! {
    /// Property: a clamped key is always within [0, 10], and explicit wins over inline
    #[test]
    fn resolved_order_is_clamped(explicit in prop::option::of(any::<i32>()), inline in prop::option::of(any::<i32>())) {
        match resolve_order(explicit, inline) {
            OrderKey::Set(value) => {
                prop_assert!(value <= 10);
                let source = explicit.or(inline).unwrap();
                prop_assert_eq!(i64::from(value), i64::from(source.clamp(0, 10)));
            }
            OrderKey::Unset => prop_assert!(explicit.is_none() && inline.is_none()),
        }
    }

    /// Property: the sequence is strictly increasing on (key, name)
    #[test]
    fn sequence_is_a_total_order(orders in orders_strategy()) {
        let decl = build(&orders, false);
        let metadata = collect(&decl).unwrap();
        let ordered = order_tests(&metadata.tests);
        prop_assert_eq!(ordered.len(), orders.len());
        for pair in ordered.windows(2) {
            let a = (pair[0].order_key(), pair[0].display_name.as_str());
            let b = (pair[1].order_key(), pair[1].display_name.as_str());
            prop_assert!(a < b, "{:?} should run before {:?}", a, b);
        }
    }

    /// Property: declaration order does not change the execution sequence
    #[test]
    fn sequence_ignores_declaration_order(orders in orders_strategy()) {
        let forward = build(&orders, false);
        let backward = build(&orders, true);
        let forward_sequence = execution_sequence(&collect(&forward).unwrap());
        let backward_sequence = execution_sequence(&collect(&backward).unwrap());
        prop_assert_eq!(&forward_sequence, &backward_sequence);

        let enabled = orders.iter().filter(|(_, _, disabled)| !disabled).count();
        prop_assert_eq!(forward_sequence.len(), enabled);
    }
}
