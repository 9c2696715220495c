//! Deterministic test ordering.
//!
//! Tests run sorted by a normalized order value, then by display name. The order value comes from an `order` tag
//! when present, otherwise from the inline order on the `test` tag, and is clamped into `[0, 10]`. A test with
//! neither sorts after every test that has one.

use std::cmp::Ordering;
use std::fmt;

use trialrun_core::tags::{ORDER_MAX, ORDER_MIN};

use super::collect::{SuiteMetadata, TestUnit};

/// Primary sort key of a test. `Set` values sort before `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderKey {
    Set(u8),
    Unset,
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKey::Set(value) => write!(f, "{}", value),
            OrderKey::Unset => f.write_str("unset"),
        }
    }
}

/// Resolve the order key from an explicit `order` value and an inline `test` order.
pub fn resolve_order(explicit: Option<i32>, inline: Option<i32>) -> OrderKey {
    match explicit.or(inline) {
        // Clamped into [0, 10], so the cast cannot truncate.
        Some(value) => OrderKey::Set(value.clamp(ORDER_MIN, ORDER_MAX) as u8),
        None => OrderKey::Unset,
    }
}

/// Compare two tests by (order key, display name).
pub fn compare<G>(a: &TestUnit<'_, G>, b: &TestUnit<'_, G>) -> Ordering {
    a.order_key()
        .cmp(&b.order_key())
        .then_with(|| a.display_name.cmp(&b.display_name))
}

/// Return the tests in execution order. The input is left untouched.
pub fn order_tests<'a, 'd, G>(tests: &'a [TestUnit<'d, G>]) -> Vec<&'a TestUnit<'d, G>> {
    let mut ordered: Vec<_> = tests.iter().collect();
    ordered.sort_by(|a, b| compare(a, b));
    ordered
}

/// Display names of the tests that will actually be invoked, in run order.
pub fn execution_sequence<G>(metadata: &SuiteMetadata<'_, G>) -> Vec<String> {
    order_tests(&metadata.tests)
        .into_iter()
        .filter(|test| test.enabled)
        .map(|test| test.display_name.clone())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::runner::collect::collect;
    use crate::runner::unit::GroupDecl;
    use trialrun_core::Tag;

    #[derive(Default)]
    struct Group;

    #[test]
    fn test_explicit_wins_over_inline() {
        assert_eq!(resolve_order(Some(3), Some(8)), OrderKey::Set(3));
        assert_eq!(resolve_order(None, Some(8)), OrderKey::Set(8));
        assert_eq!(resolve_order(None, None), OrderKey::Unset);
    }

    #[test]
    fn test_values_are_clamped() {
        assert_eq!(resolve_order(Some(42), None), OrderKey::Set(10));
        assert_eq!(resolve_order(Some(-5), None), OrderKey::Set(0));
        assert_eq!(resolve_order(None, Some(i32::MIN)), OrderKey::Set(0));
        assert_eq!(resolve_order(None, Some(i32::MAX)), OrderKey::Set(10));
    }

    #[test]
    fn test_unset_sorts_after_everything() {
        assert!(OrderKey::Set(10) < OrderKey::Unset);
        assert!(OrderKey::Set(0) < OrderKey::Set(1));
    }

    #[test]
    fn test_order_then_name() {
        let decl = GroupDecl::<Group>::new("Group")
            .factory_default()
            .instance_unit("zeta", [Tag::test(), Tag::order(2)], |_| ())
            .instance_unit("unordered_b", [Tag::test()], |_| ())
            .instance_unit("alpha", [Tag::test(), Tag::order(2)], |_| ())
            .instance_unit("unordered_a", [Tag::test()], |_| ())
            .instance_unit("big", [Tag::test(), Tag::order(99)], |_| ())
            .instance_unit("inline", [Tag::test_in_order(1)], |_| ());
        let metadata = collect(&decl).unwrap();
        let names: Vec<_> = order_tests(&metadata.tests)
            .iter()
            .map(|t| t.display_name.as_str())
            .collect();
        assert_eq!(names, ["inline", "alpha", "zeta", "big", "unordered_a", "unordered_b"]);
    }

    #[test]
    fn test_clamped_values_tie_break_on_name() {
        let decl = GroupDecl::<Group>::new("Group")
            .factory_default()
            .instance_unit("b", [Tag::test(), Tag::order(50)], |_| ())
            .instance_unit("a", [Tag::test(), Tag::order(10)], |_| ())
            .instance_unit("c", [Tag::test(), Tag::order(-1)], |_| ())
            .instance_unit("d", [Tag::test(), Tag::bare_order()], |_| ());
        let metadata = collect(&decl).unwrap();
        let names: Vec<_> = order_tests(&metadata.tests)
            .iter()
            .map(|t| t.display_name.as_str())
            .collect();
        assert_eq!(names, ["c", "d", "a", "b"]);
    }

    #[test]
    fn test_sequence_leaves_out_disabled() {
        let decl = GroupDecl::<Group>::new("Group")
            .factory_default()
            .instance_unit("later", [Tag::test(), Tag::order(4)], |_| ())
            .instance_unit("off", [Tag::test(), Tag::Disabled, Tag::order(0)], |_| ())
            .instance_unit("first", [Tag::test(), Tag::order(0)], |_| ());
        let metadata = collect(&decl).unwrap();
        assert_eq!(execution_sequence(&metadata), ["first", "later"]);
        assert_eq!(order_tests(&metadata.tests).len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderKey::Set(7).to_string(), "7");
        assert_eq!(OrderKey::Unset.to_string(), "unset");
    }
}
