//! `#[test_group]` expansion: tag parsing, naming, scopes and factories.

use trialrun::runner::{OrderKey, collect, execution_sequence, plan};
use trialrun::{OutcomeKind, Role, Scope, Tag, TestGroup, run_tests, test_group};

#[derive(Default)]
struct Attributes {
    value: i32,
}

#[test_group(name = "attribute-forms")]
impl Attributes {
    /// Doc comments stay on the method.
    #[test(name = "renamed", order = 3)]
    fn named(&mut self) {}

    #[test(order = 5)]
    #[order(2)]
    fn explicit_beats_inline(&mut self) {}

    #[test]
    #[order(value = -4)]
    fn negative(&mut self) {}

    #[test(name = "")]
    fn empty_name(&mut self) {}

    #[test]
    #[allow(clippy::needless_pass_by_ref_mut)]
    fn with_lint(&mut self) {
        self.value += 1;
    }

    #[test]
    #[beforeeach]
    #[disabled]
    fn two_roles_via_alias(&mut self) {}

    fn plain_helper(&self) -> i32 {
        self.value
    }
}

#[test]
fn test_group_name_argument() {
    assert_eq!(Attributes::declare().name(), "attribute-forms");
}

#[test]
fn test_recognized_tags_are_translated() {
    let decl = Attributes::declare();
    let units: Vec<_> = decl.units().iter().map(|unit| unit.ident.as_str()).collect();
    assert_eq!(
        units,
        ["named", "explicit_beats_inline", "negative", "empty_name", "with_lint", "two_roles_via_alias"]
    );

    assert_eq!(
        decl.units()[0].tags,
        [Tag::Test {
            name: Some("renamed".to_string()),
            order: Some(3),
        }]
    );
    assert_eq!(
        decl.units()[1].tags,
        [Tag::test_in_order(5), Tag::order(2)]
    );
    assert_eq!(decl.units()[2].tags, [Tag::test(), Tag::order(-4)]);
    assert_eq!(
        decl.units()[4].tags,
        [Tag::test(), Tag::unknown("allow")]
    );
    assert!(decl.units().iter().all(|unit| unit.scope() == Scope::Instance));
}

#[test]
fn test_alias_spelling_counts_as_a_role() {
    let decl = Attributes::declare();
    // `beforeeach` is an alias of `before_each`, so the unit claims two roles.
    let err = collect(&decl).unwrap_err();
    assert_eq!(err.subject(), "two_roles_via_alias");
    assert_eq!(Attributes::default().plain_helper(), 0);
}

#[derive(Default)]
struct Ordered;

#[test_group]
impl Ordered {
    #[test(name = "renamed", order = 3)]
    fn named(&mut self) {}

    #[test(order = 5)]
    #[order(2)]
    fn explicit_beats_inline(&mut self) {}

    #[test]
    #[order(value = -4)]
    fn negative(&mut self) {}

    #[test(name = "")]
    fn empty_name(&mut self) {}

    #[test]
    #[order(99)]
    fn huge(&self) {}
}

#[test]
fn test_plan_resolves_names_and_orders() {
    let entries = plan::<Ordered>().unwrap();
    let resolved: Vec<_> = entries
        .iter()
        .map(|entry| (entry.display_name.as_str(), entry.order))
        .collect();
    assert_eq!(
        resolved,
        [
            ("negative", OrderKey::Set(0)),
            ("explicit_beats_inline", OrderKey::Set(2)),
            ("renamed", OrderKey::Set(3)),
            ("huge", OrderKey::Set(10)),
            ("empty_name", OrderKey::Unset),
        ]
    );
}

#[test]
fn test_default_group_name_is_the_type_name() {
    let decl = Ordered::declare();
    assert_eq!(decl.name(), "Ordered");
    assert!(decl.has_factory());
    let metadata = collect(&decl).unwrap();
    assert_eq!(execution_sequence(&metadata).len(), 5);
}

struct Seeded {
    seed: u64,
}

#[test_group(factory = || Seeded { seed: 42 })]
impl Seeded {
    #[before_suite]
    fn announce() {}

    #[test]
    fn sees_seed(&self) -> trialrun::AssertResult {
        trialrun::assert_equals(42u64, self.seed)
    }
}

#[test]
fn test_custom_factory_and_suite_scope() {
    let decl = Seeded::declare();
    assert_eq!(decl.units()[0].scope(), Scope::Suite);
    let metadata = collect(&decl).unwrap();
    assert_eq!(metadata.idents(Role::BeforeSuite), ["announce"]);

    let report = run_tests::<Seeded>().unwrap();
    assert_eq!(report.names(OutcomeKind::Success), ["sees_seed"]);
}

#[derive(Default)]
struct RepeatedTag;

#[test_group]
impl RepeatedTag {
    #[test]
    #[disabled]
    #[disabled]
    fn twice(&mut self) {}
}

#[test]
fn test_repeated_tag_is_structural() {
    let err = run_tests::<RepeatedTag>().unwrap_err();
    assert_eq!(
        err,
        trialrun::StructuralError::DuplicateTag {
            unit: "twice".to_string(),
            tag: "disabled",
        }
    );
}

#[derive(Default)]
struct Conditional;

#[test_group]
impl Conditional {
    #[test]
    #[cfg(all())]
    fn compiled_in(&mut self) {}

    #[test]
    #[cfg(any())]
    fn compiled_out(&mut self) {}
}

#[test]
fn test_cfg_follows_the_method() {
    let decl = Conditional::declare();
    let units: Vec<_> = decl.units().iter().map(|unit| unit.ident.as_str()).collect();
    assert_eq!(units, ["compiled_in"]);
    assert_eq!(decl.units()[0].tags, [Tag::test()]);

    let report = run_tests::<Conditional>().unwrap();
    assert_eq!(report.names(OutcomeKind::Success), ["compiled_in"]);
}
