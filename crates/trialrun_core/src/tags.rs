//! Tag vocabulary registry.
//!
//! A test group author attaches tags to declared units. This module centralizes the recognized tag spellings, the
//! role each tag implies and the scope that role requires, so downstream code matches on a closed enum instead of
//! comparing names.
//!
//! ## Notes
//! - `Order` and `Disabled` are attributes of a test, not roles. A unit tagged only with them has no role.
//! - Unrecognized tags are carried as [`Tag::Unknown`] and ignored by the runner.

use std::fmt;

/// Lowest normalized order value.
pub const ORDER_MIN: i32 = 0;

/// Highest normalized order value. Larger explicit values clamp to this.
pub const ORDER_MAX: i32 = 10;

/// Value carried by an `Order` tag written without an explicit value.
pub const ORDER_DEFAULT: i32 = 0;

/// Named argument for `#[test(name = "...")]`.
pub const TEST_NAME_ARG: &str = "name";

/// Named argument for `#[test(order = N)]`.
pub const TEST_ORDER_ARG: &str = "order";

/// Named argument for `#[order(value = N)]` (the positional form `#[order(N)]` is equivalent).
pub const ORDER_VALUE_ARG: &str = "value";

/// Stable identifier for a recognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagId {
    Test,
    Order,
    Disabled,
    BeforeEach,
    AfterEach,
    BeforeSuite,
    AfterSuite,
}

/// Where a unit can be invoked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Invocable without a group instance.
    Suite,
    /// Invocable only on a constructed group instance.
    Instance,
}

/// Lifecycle role a unit plays in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    BeforeSuite,
    AfterSuite,
    BeforeEach,
    AfterEach,
    Test,
}

impl Role {
    /// Scope a unit must have to play this role.
    pub const fn required_scope(self) -> Scope {
        match self {
            Role::BeforeSuite | Role::AfterSuite => Scope::Suite,
            Role::BeforeEach | Role::AfterEach | Role::Test => Scope::Instance,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::BeforeSuite => "before_suite",
            Role::AfterSuite => "after_suite",
            Role::BeforeEach => "before_each",
            Role::AfterEach => "after_each",
            Role::Test => "test",
        }
    }

    /// Whether this role is a lifecycle hook rather than a test case.
    pub const fn is_hook(self) -> bool {
        !matches!(self, Role::Test)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Suite => f.write_str("suite"),
            Scope::Instance => f.write_str("instance"),
        }
    }
}

impl TagId {
    /// Role implied by this tag, or `None` for attribute-only tags.
    pub const fn role(self) -> Option<Role> {
        match self {
            TagId::Test => Some(Role::Test),
            TagId::BeforeEach => Some(Role::BeforeEach),
            TagId::AfterEach => Some(Role::AfterEach),
            TagId::BeforeSuite => Some(Role::BeforeSuite),
            TagId::AfterSuite => Some(Role::AfterSuite),
            TagId::Order | TagId::Disabled => None,
        }
    }
}

/// Metadata entry for a recognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo {
    pub id: TagId,
    /// Attribute spelling used by `#[test_group]`.
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    /// Named attributes the tag accepts.
    pub attributes: &'static [&'static str],
    /// `None` means the tag may appear on a unit of any scope.
    pub allowed_scope: Option<Scope>,
    pub description: &'static str,
}

/// Registry of recognized tags.
pub const TAGS: &[TagInfo] = &[
    TagInfo {
        id: TagId::Test,
        canonical: "test",
        aliases: &[],
        attributes: &[TEST_NAME_ARG, TEST_ORDER_ARG],
        allowed_scope: Some(Scope::Instance),
        description: "Mark a unit as a test case.",
    },
    TagInfo {
        id: TagId::Order,
        canonical: "order",
        aliases: &[],
        attributes: &[ORDER_VALUE_ARG],
        allowed_scope: None,
        description: "Override the inline order of a test.",
    },
    TagInfo {
        id: TagId::Disabled,
        canonical: "disabled",
        aliases: &[],
        attributes: &[],
        allowed_scope: Some(Scope::Instance),
        description: "Skip a test without invoking it. Requires `test`.",
    },
    TagInfo {
        id: TagId::BeforeEach,
        canonical: "before_each",
        aliases: &["beforeeach"],
        attributes: &[],
        allowed_scope: Some(Scope::Instance),
        description: "Run before every test on the fresh instance.",
    },
    TagInfo {
        id: TagId::AfterEach,
        canonical: "after_each",
        aliases: &["aftereach"],
        attributes: &[],
        allowed_scope: Some(Scope::Instance),
        description: "Run after every test on the same instance.",
    },
    TagInfo {
        id: TagId::BeforeSuite,
        canonical: "before_suite",
        aliases: &["beforesuite"],
        attributes: &[],
        allowed_scope: Some(Scope::Suite),
        description: "Run once before any test, without an instance.",
    },
    TagInfo {
        id: TagId::AfterSuite,
        canonical: "after_suite",
        aliases: &["aftersuite"],
        attributes: &[],
        allowed_scope: Some(Scope::Suite),
        description: "Run once after all tests, without an instance.",
    },
];

/// Resolve a tag spelling to its stable id.
pub fn from_str(name: &str) -> Option<TagId> {
    if let Some(info) = TAGS.iter().find(|t| t.canonical == name) {
        return Some(info.id);
    }
    TAGS.iter().find(|t| t.aliases.contains(&name)).map(|t| t.id)
}

/// Return the canonical spelling for a tag.
pub fn as_str(id: TagId) -> &'static str {
    info_for(id).canonical
}

/// Return the metadata entry for a tag.
pub fn info_for(id: TagId) -> &'static TagInfo {
    match TAGS.iter().find(|t| t.id == id) {
        Some(info) => info,
        None => unreachable!("every TagId has a registry entry"),
    }
}

/// A tag attached to one declared unit, with its attribute values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Test { name: Option<String>, order: Option<i32> },
    Order { value: i32 },
    Disabled,
    BeforeEach,
    AfterEach,
    BeforeSuite,
    AfterSuite,
    /// Any tag outside the vocabulary, by its spelling.
    Unknown(String),
}

impl Tag {
    /// A plain `Test` tag: no explicit name, no inline order.
    pub fn test() -> Self {
        Tag::Test { name: None, order: None }
    }

    pub fn named_test(name: impl Into<String>) -> Self {
        Tag::Test {
            name: Some(name.into()),
            order: None,
        }
    }

    /// A `Test` tag carrying an inline order.
    pub fn test_in_order(order: i32) -> Self {
        Tag::Test {
            name: None,
            order: Some(order),
        }
    }

    pub fn order(value: i32) -> Self {
        Tag::Order { value }
    }

    /// An `Order` tag written without a value.
    pub fn bare_order() -> Self {
        Tag::Order { value: ORDER_DEFAULT }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Tag::Unknown(name.into())
    }

    /// Stable id of this tag, `None` for [`Tag::Unknown`].
    pub fn id(&self) -> Option<TagId> {
        match self {
            Tag::Test { .. } => Some(TagId::Test),
            Tag::Order { .. } => Some(TagId::Order),
            Tag::Disabled => Some(TagId::Disabled),
            Tag::BeforeEach => Some(TagId::BeforeEach),
            Tag::AfterEach => Some(TagId::AfterEach),
            Tag::BeforeSuite => Some(TagId::BeforeSuite),
            Tag::AfterSuite => Some(TagId::AfterSuite),
            Tag::Unknown(_) => None,
        }
    }

    /// Role implied by this tag, if any.
    pub fn role(&self) -> Option<Role> {
        self.id().and_then(TagId::role)
    }

    /// Spelling of this tag as written by an author.
    pub fn spelling(&self) -> &str {
        match self {
            Tag::Unknown(name) => name,
            other => match other.id() {
                Some(id) => as_str(id),
                None => "",
            },
        }
    }
}
