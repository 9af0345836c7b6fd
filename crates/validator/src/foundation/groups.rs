//! Validation groups
//!
//! Every constraint belongs to at least one group. Constraints declared
//! without groups belong to [`DEFAULT_GROUP`]. A validation run selects the
//! constraints whose groups intersect the requested set; when the caller
//! requests nothing, only `Default` is requested.

use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;
use smallvec::SmallVec;

/// Name of the implicit catch-all group.
pub const DEFAULT_GROUP: &str = "Default";

static DEFAULT_GROUPS: LazyLock<Groups> = LazyLock::new(Groups::default_group);

/// A non-empty, ordered, duplicate-free set of group names.
///
/// Names are kept sorted so that two sets with the same members compare
/// equal regardless of declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Groups(SmallVec<[String; 2]>);

impl Groups {
    /// The `{"Default"}` set.
    #[must_use]
    pub fn default_group() -> Self {
        Self(smallvec::smallvec![DEFAULT_GROUP.to_owned()])
    }

    /// Builds a set from names. An empty input yields `{"Default"}`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: SmallVec<[String; 2]> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Self::default_group();
        }
        names.sort_unstable();
        names.dedup();
        Self(names)
    }

    /// A single named group.
    pub fn single(name: impl Into<String>) -> Self {
        Self(smallvec::smallvec![name.into()])
    }

    pub(crate) fn default_ref() -> &'static Self {
        &DEFAULT_GROUPS
    }

    /// Returns true if `name` is a member.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|g| g == name)
    }

    /// Returns true if the two sets share at least one member.
    #[must_use]
    pub fn intersects(&self, other: &Groups) -> bool {
        self.0.iter().any(|g| other.contains(g))
    }

    /// Returns true if the set is exactly `{"Default"}`.
    #[must_use]
    pub fn is_default_only(&self) -> bool {
        self.0.len() == 1 && self.0[0] == DEFAULT_GROUP
    }

    /// Iterates the member names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of members. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Groups {
    fn default() -> Self {
        Self::default_group()
    }
}

impl fmt::Display for Groups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, group) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(group)?;
        }
        Ok(())
    }
}

impl From<&str> for Groups {
    fn from(name: &str) -> Self {
        Self::single(name)
    }
}

impl From<String> for Groups {
    fn from(name: String) -> Self {
        Self::single(name)
    }
}

impl<S: Into<String>> FromIterator<S> for Groups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Groups {
    fn from(names: [S; N]) -> Self {
        Self::new(names)
    }
}

/// Decides whether a constraint tagged with `constraint_groups` runs when
/// `requested` groups are validated.
#[must_use]
pub fn is_selected(requested: &Groups, constraint_groups: &Groups) -> bool {
    requested.intersects(constraint_groups)
}

// ============================================================================
// TESTS
// ============================================================================
