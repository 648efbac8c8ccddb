//! Placeholder-aware identifiers.
//!
//! A batched page-update mutation lets later actions reference entities
//! created by earlier actions through client-chosen placeholder ids. On the
//! wire those are plain strings with a fixed `placeholder-` prefix; in the
//! core they are a tagged union so that nothing downstream has to sniff
//! string prefixes.

use crate::{EntityId, Error, VersionedUri};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Prefix that marks a string id as a placeholder.
const PLACEHOLDER_PREFIX: &str = "placeholder-";

/// A client-chosen temporary identifier, scoped to a single batch.
///
/// Stores the full prefixed string it arrived as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderId(String);

impl PlaceholderId {
    /// Parses a placeholder id; returns `None` when the string does not
    /// carry the placeholder prefix.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        s.starts_with(PLACEHOLDER_PREFIX).then(|| Self(s.to_owned()))
    }

    /// Creates a placeholder id from an unprefixed suffix.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Self {
        Self(format!("{PLACEHOLDER_PREFIX}{suffix}"))
    }

    /// Returns the full prefixed id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An id position that may hold either a real identifier or a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaybePlaceholder<T> {
    /// A resolved, server-known identifier.
    Real(T),
    /// A placeholder to be resolved against the batch's placeholder map.
    Placeholder(PlaceholderId),
}

/// An entity id position in a mutation payload.
pub type Identifier = MaybePlaceholder<EntityId>;

/// An entity-type id position in a mutation payload.
pub type TypeIdentifier = MaybePlaceholder<VersionedUri>;

impl<T> MaybePlaceholder<T> {
    /// Returns true for the placeholder variant.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    /// Returns the real identifier, if this is one.
    #[must_use]
    pub const fn as_real(&self) -> Option<&T> {
        match self {
            Self::Real(id) => Some(id),
            Self::Placeholder(_) => None,
        }
    }
}

impl<T> MaybePlaceholder<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    /// Classifies a wire string: the placeholder prefix wins, anything else
    /// must parse as a real identifier.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if let Some(placeholder) = PlaceholderId::parse(s) {
            return Ok(Self::Placeholder(placeholder));
        }
        T::from_str(s)
            .map(Self::Real)
            .map_err(|err| Error::InvalidIdentifier(format!("{s}: {err}")))
    }
}

impl<T> From<T> for MaybePlaceholder<T> {
    fn from(id: T) -> Self {
        Self::Real(id)
    }
}

impl<T: fmt::Display> fmt::Display for MaybePlaceholder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(id) => id.fmt(f),
            Self::Placeholder(placeholder) => placeholder.fmt(f),
        }
    }
}

impl<T: fmt::Display> Serialize for MaybePlaceholder<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for MaybePlaceholder<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(D::Error::custom)
    }
}
