//! Provide the canonical tag vocabulary for trialrun test groups.
//!
//! This crate is data only: the closed set of recognized tags, the roles they imply and the scope each role
//! requires. Both the runner (validation) and the `#[test_group]` macro (attribute scanning) read it, so neither
//! has to compare stringly-typed names on its own.
//!
//! ## Notes
//!
//! - No IO, no global state, no dependencies.

pub mod tags;

pub use tags::{Role, Scope, Tag, TagId};
