//! Metadata collection and structural validation.
//!
//! Scans the declared units of a group, assigns each to the role its tags imply and checks the structural rules:
//!
//! - `before_suite` / `after_suite` units must be suite-scope.
//! - `before_each` / `after_each` / `test` units must be instance-scope.
//! - `disabled` is only legal next to `test`.
//! - A unit plays at most one role and carries each recognized tag at most once.
//!
//! `order` and `disabled` attach to the test as attributes. Unknown tags are logged and ignored. Any violation
//! fails the whole collection, before anything is invoked.

use std::fmt;

use trialrun_core::{Role, Scope, Tag, TagId, tags};

use super::error::StructuralError;
use super::order::{OrderKey, resolve_order};
use super::unit::{DeclaredUnit, GroupDecl, UnitBody, UnitResult};

type InstanceBody<'d, G> = &'d dyn Fn(&mut G) -> UnitResult;

/// A collected test case.
pub struct TestUnit<'d, G> {
    pub ident: &'d str,
    /// Explicit `test(name = ...)` when non-empty, otherwise the unit identifier.
    pub display_name: String,
    /// Order carried inline on the `test` tag.
    pub inline_order: Option<i32>,
    /// Order from a separate `order` tag; wins over `inline_order`.
    pub explicit_order: Option<i32>,
    /// `false` when the unit is tagged `disabled`.
    pub enabled: bool,
    body: InstanceBody<'d, G>,
}

impl<'d, G> TestUnit<'d, G> {
    /// Normalized primary sort key.
    pub fn order_key(&self) -> OrderKey {
        resolve_order(self.explicit_order, self.inline_order)
    }

    pub(crate) fn invoke(&self, instance: &mut G) -> UnitResult {
        (self.body)(instance)
    }
}

impl<G> fmt::Debug for TestUnit<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestUnit")
            .field("ident", &self.ident)
            .field("display_name", &self.display_name)
            .field("inline_order", &self.inline_order)
            .field("explicit_order", &self.explicit_order)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// A collected lifecycle hook. `B` is the body shape: suite hooks take nothing, per-test hooks take the instance.
pub struct HookUnit<'d, B: ?Sized> {
    pub ident: &'d str,
    pub role: Role,
    body: &'d B,
}

pub type SuiteHook<'d> = HookUnit<'d, dyn Fn() -> UnitResult + 'd>;
pub type InstanceHook<'d, G> = HookUnit<'d, dyn Fn(&mut G) -> UnitResult + 'd>;

impl SuiteHook<'_> {
    pub(crate) fn invoke(&self) -> UnitResult {
        (self.body)()
    }
}

impl<G> InstanceHook<'_, G> {
    pub(crate) fn invoke(&self, instance: &mut G) -> UnitResult {
        (self.body)(instance)
    }
}

impl<B: ?Sized> fmt::Debug for HookUnit<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookUnit")
            .field("ident", &self.ident)
            .field("role", &self.role)
            .finish()
    }
}

/// Units of one group, by role, each list in declaration order.
pub struct SuiteMetadata<'d, G> {
    pub group: &'d str,
    pub before_suite: Vec<SuiteHook<'d>>,
    pub after_suite: Vec<SuiteHook<'d>>,
    pub before_each: Vec<InstanceHook<'d, G>>,
    pub after_each: Vec<InstanceHook<'d, G>>,
    pub tests: Vec<TestUnit<'d, G>>,
}

impl<'d, G> SuiteMetadata<'d, G> {
    fn empty(group: &'d str) -> Self {
        Self {
            group,
            before_suite: Vec::new(),
            after_suite: Vec::new(),
            before_each: Vec::new(),
            after_each: Vec::new(),
            tests: Vec::new(),
        }
    }

    /// Number of units collected under `role`.
    pub fn count(&self, role: Role) -> usize {
        match role {
            Role::BeforeSuite => self.before_suite.len(),
            Role::AfterSuite => self.after_suite.len(),
            Role::BeforeEach => self.before_each.len(),
            Role::AfterEach => self.after_each.len(),
            Role::Test => self.tests.len(),
        }
    }

    /// Identifiers of the units collected under `role`.
    pub fn idents(&self, role: Role) -> Vec<&'d str> {
        match role {
            Role::BeforeSuite => self.before_suite.iter().map(|h| h.ident).collect(),
            Role::AfterSuite => self.after_suite.iter().map(|h| h.ident).collect(),
            Role::BeforeEach => self.before_each.iter().map(|h| h.ident).collect(),
            Role::AfterEach => self.after_each.iter().map(|h| h.ident).collect(),
            Role::Test => self.tests.iter().map(|t| t.ident).collect(),
        }
    }
}

impl<G> fmt::Debug for SuiteMetadata<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteMetadata")
            .field("group", &self.group)
            .field("before_suite", &self.before_suite)
            .field("after_suite", &self.after_suite)
            .field("before_each", &self.before_each)
            .field("after_each", &self.after_each)
            .field("tests", &self.tests)
            .finish()
    }
}

/// Tags of one unit, folded into a role plus test attributes.
#[derive(Default)]
struct Classified<'d> {
    role: Option<Role>,
    test_name: Option<&'d str>,
    inline_order: Option<i32>,
    explicit_order: Option<i32>,
    disabled: bool,
}

/// Collect and validate the units of `decl`.
///
/// ## Errors
///
/// Returns the first [`StructuralError`] found, in declaration order.
pub fn collect<G>(decl: &GroupDecl<G>) -> Result<SuiteMetadata<'_, G>, StructuralError> {
    let mut metadata = SuiteMetadata::empty(decl.name());

    for unit in decl.units() {
        let classified = classify_tags(unit)?;
        let Some(role) = classified.role else {
            tracing::debug!(group = decl.name(), unit = %unit.ident, "unit has no role, ignoring");
            continue;
        };
        if classified.explicit_order.is_some() && role != Role::Test {
            tracing::debug!(unit = %unit.ident, %role, "order tag has no effect outside tests");
        }

        match (role, &unit.body) {
            (Role::BeforeSuite, UnitBody::Suite(body)) => metadata.before_suite.push(HookUnit {
                ident: &unit.ident,
                role,
                body: &**body,
            }),
            (Role::AfterSuite, UnitBody::Suite(body)) => metadata.after_suite.push(HookUnit {
                ident: &unit.ident,
                role,
                body: &**body,
            }),
            (Role::BeforeEach, UnitBody::Instance(body)) => metadata.before_each.push(HookUnit {
                ident: &unit.ident,
                role,
                body: &**body,
            }),
            (Role::AfterEach, UnitBody::Instance(body)) => metadata.after_each.push(HookUnit {
                ident: &unit.ident,
                role,
                body: &**body,
            }),
            (Role::Test, UnitBody::Instance(body)) => metadata.tests.push(TestUnit {
                ident: &unit.ident,
                display_name: display_name(&unit.ident, classified.test_name),
                inline_order: classified.inline_order,
                explicit_order: classified.explicit_order,
                enabled: !classified.disabled,
                body: &**body,
            }),
            // Scope mismatches are rejected in `classify_tags`.
            _ => return Err(scope_error(unit, role)),
        }
    }

    tracing::debug!(
        group = decl.name(),
        tests = metadata.tests.len(),
        before_suite = metadata.before_suite.len(),
        after_suite = metadata.after_suite.len(),
        before_each = metadata.before_each.len(),
        after_each = metadata.after_each.len(),
        "collected suite metadata"
    );
    Ok(metadata)
}

fn classify_tags<G>(unit: &DeclaredUnit<G>) -> Result<Classified<'_>, StructuralError> {
    let mut classified = Classified::default();
    let mut seen: Vec<TagId> = Vec::new();

    for tag in &unit.tags {
        let Some(id) = tag.id() else {
            tracing::info!(unit = %unit.ident, tag = tag.spelling(), "skipping unknown tag");
            continue;
        };
        if seen.contains(&id) {
            return Err(StructuralError::DuplicateTag {
                unit: unit.ident.clone(),
                tag: tags::as_str(id),
            });
        }
        seen.push(id);

        if let Some(role) = id.role() {
            if let Some(first) = classified.role {
                return Err(StructuralError::MultipleRoles {
                    unit: unit.ident.clone(),
                    first,
                    second: role,
                });
            }
            if unit.scope() != role.required_scope() {
                return Err(scope_error(unit, role));
            }
            classified.role = Some(role);
        }

        match tag {
            Tag::Test { name, order } => {
                classified.test_name = name.as_deref();
                classified.inline_order = *order;
            }
            Tag::Order { value } => classified.explicit_order = Some(*value),
            Tag::Disabled => classified.disabled = true,
            _ => {}
        }
    }

    if classified.disabled && classified.role != Some(Role::Test) {
        return Err(StructuralError::DisabledWithoutTest {
            unit: unit.ident.clone(),
        });
    }
    Ok(classified)
}

fn scope_error<G>(unit: &DeclaredUnit<G>, role: Role) -> StructuralError {
    match role.required_scope() {
        Scope::Suite => StructuralError::ExpectedSuiteScope {
            unit: unit.ident.clone(),
            role,
        },
        Scope::Instance => StructuralError::ExpectedInstanceScope {
            unit: unit.ident.clone(),
            role,
        },
    }
}

fn display_name(ident: &str, explicit: Option<&str>) -> String {
    match explicit {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => ident.to_string(),
    }
}
