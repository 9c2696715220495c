//! Declared units and test-group registration.
//!
//! There is no runtime reflection to discover methods, so a test group lists its units explicitly: a name, a body
//! and the tags attached to it. The `#[test_group]` attribute macro writes this declaration from an `impl` block;
//! [`GroupDecl`] can also be built by hand.
//!
//! ## Scope
//!
//! The scope of a unit is the shape of its body. [`UnitBody::Suite`] bodies take no instance,
//! [`UnitBody::Instance`] bodies take `&mut G`. Tags only declare the role; the collector checks that the two agree.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use trialrun_core::{Scope, Tag};

use super::error::StructuralError;
use super::outcome::signal_from_panic;

/// Anything a unit can raise.
pub type Signal = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of invoking a unit body.
pub type UnitResult = Result<(), Signal>;

/// Convert the return value of a unit body into a [`UnitResult`].
///
/// Bodies may return `()` or any `Result<(), E>` whose error converts into a [`Signal`].
pub trait IntoUnitResult {
    fn into_unit_result(self) -> UnitResult;
}

impl IntoUnitResult for () {
    fn into_unit_result(self) -> UnitResult {
        Ok(())
    }
}

impl<E: Into<Signal>> IntoUnitResult for Result<(), E> {
    fn into_unit_result(self) -> UnitResult {
        self.map_err(Into::into)
    }
}

type SuiteFn = Box<dyn Fn() -> UnitResult>;
type InstanceFn<G> = Box<dyn Fn(&mut G) -> UnitResult>;
type Factory<G> = Box<dyn Fn() -> Result<G, Signal>>;

/// The callable part of a declared unit.
pub enum UnitBody<G> {
    /// Invocable without a group instance.
    Suite(SuiteFn),
    /// Invocable only on a group instance.
    Instance(InstanceFn<G>),
}

impl<G> UnitBody<G> {
    pub fn suite<F, R>(f: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: IntoUnitResult,
    {
        UnitBody::Suite(Box::new(move || f().into_unit_result()))
    }

    pub fn instance<F, R>(f: F) -> Self
    where
        F: Fn(&mut G) -> R + 'static,
        R: IntoUnitResult,
    {
        UnitBody::Instance(Box::new(move |group: &mut G| f(group).into_unit_result()))
    }

    pub fn scope(&self) -> Scope {
        match self {
            UnitBody::Suite(_) => Scope::Suite,
            UnitBody::Instance(_) => Scope::Instance,
        }
    }
}

impl<G> fmt::Debug for UnitBody<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitBody::Suite(_) => f.write_str("Suite(..)"),
            UnitBody::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

/// One declared unit of a test group, before classification.
pub struct DeclaredUnit<G> {
    pub ident: String,
    pub body: UnitBody<G>,
    pub tags: Vec<Tag>,
}

impl<G> DeclaredUnit<G> {
    pub fn scope(&self) -> Scope {
        self.body.scope()
    }
}

impl<G> fmt::Debug for DeclaredUnit<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredUnit")
            .field("ident", &self.ident)
            .field("body", &self.body)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Declaration of a test group: its name, how to construct an instance and its units in declaration order.
pub struct GroupDecl<G> {
    name: String,
    factory: Option<Factory<G>>,
    units: Vec<DeclaredUnit<G>>,
}

impl<G> GroupDecl<G> {
    /// Start a declaration with no factory and no units.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            factory: None,
            units: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &[DeclaredUnit<G>] {
        &self.units
    }

    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// Construct a brand-new instance of the group.
    ///
    /// A missing factory, a factory error and a panicking factory are all reported as
    /// [`StructuralError::Instantiation`].
    pub fn instantiate(&self) -> Result<G, StructuralError> {
        let Some(factory) = &self.factory else {
            return Err(self.instantiation_error("no zero-argument factory was declared"));
        };
        match panic::catch_unwind(AssertUnwindSafe(factory)) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(signal)) => Err(self.instantiation_error(signal)),
            Err(payload) => Err(self.instantiation_error(signal_from_panic(payload))),
        }
    }

    fn instantiation_error(&self, reason: impl fmt::Display) -> StructuralError {
        StructuralError::Instantiation {
            group: self.name.clone(),
            reason: reason.to_string(),
        }
    }
}

impl<G: 'static> GroupDecl<G> {
    /// Use `f` as the zero-argument constructor.
    pub fn factory<F>(mut self, f: F) -> Self
    where
        F: Fn() -> G + 'static,
    {
        self.factory = Some(Box::new(move || Ok(f())));
        self
    }

    /// Use a fallible zero-argument constructor. An `Err` aborts the run with a structural error.
    pub fn try_factory<F, E>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<G, E> + 'static,
        E: Into<Signal>,
    {
        self.factory = Some(Box::new(move || f().map_err(Into::into)));
        self
    }

    /// Add a unit with an explicit body.
    pub fn unit(mut self, ident: impl Into<String>, body: UnitBody<G>, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.units.push(DeclaredUnit {
            ident: ident.into(),
            body,
            tags: tags.into_iter().collect(),
        });
        self
    }

    /// Add a unit invocable without an instance.
    pub fn suite_unit<F, R>(self, ident: impl Into<String>, tags: impl IntoIterator<Item = Tag>, f: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: IntoUnitResult,
    {
        self.unit(ident, UnitBody::suite(f), tags)
    }

    /// Add a unit invoked on a group instance.
    pub fn instance_unit<F, R>(self, ident: impl Into<String>, tags: impl IntoIterator<Item = Tag>, f: F) -> Self
    where
        F: Fn(&mut G) -> R + 'static,
        R: IntoUnitResult,
    {
        self.unit(ident, UnitBody::instance(f), tags)
    }
}

impl<G: Default + 'static> GroupDecl<G> {
    /// Use `G::default` as the zero-argument constructor.
    pub fn factory_default(self) -> Self {
        self.factory(G::default)
    }
}

impl<G> fmt::Debug for GroupDecl<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupDecl")
            .field("name", &self.name)
            .field("has_factory", &self.factory.is_some())
            .field("units", &self.units)
            .finish()
    }
}

/// A type that declares itself as a test group.
///
/// Usually implemented by `#[test_group]`. [`TestGroup::declare`] is called once per run; the resulting
/// metadata is never cached across runs.
pub trait TestGroup: Sized + 'static {
    fn declare() -> GroupDecl<Self>;
}
