//! Type URIs for the ontology.
//!
//! Entity and link types are identified by versioned URIs of the form
//! `<base>v/<version>`, where the base URI always ends with a slash.
//! Entities reference their type; they never own it.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The unversioned base URI of a type. Property maps are keyed by the
/// property type's base URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseUri(String);

impl BaseUri {
    /// Creates a base URI from a string.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Returns the URI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BaseUri {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A versioned reference to an entity, link or property type.
///
/// Canonical text form is `<base>v/<version>`, e.g.
/// `https://pagegraph.dev/types/entity-type/block/v/1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionedUri {
    base: BaseUri,
    version: u32,
}

impl VersionedUri {
    /// Creates a versioned URI from its base and version.
    #[must_use]
    pub const fn new(base: BaseUri, version: u32) -> Self {
        Self { base, version }
    }

    /// Returns the base URI.
    #[must_use]
    pub const fn base(&self) -> &BaseUri {
        &self.base
    }

    /// Returns the version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Parses a versioned URI from its canonical `<base>v/<version>` form.
    pub fn parse(s: &str) -> crate::Result<Self> {
        let (base, version) = s
            .rsplit_once("v/")
            .ok_or_else(|| Error::InvalidUri(format!("missing `v/<version>` suffix: {s}")))?;
        if base.is_empty() || !base.ends_with('/') {
            return Err(Error::InvalidUri(format!(
                "base URI must be non-empty and end with a slash: {s}"
            )));
        }
        let version = version
            .parse::<u32>()
            .map_err(|_| Error::InvalidUri(format!("version is not a number: {s}")))?;
        Ok(Self::new(BaseUri::new(base), version))
    }
}

impl fmt::Display for VersionedUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v/{}", self.base, self.version)
    }
}

impl FromStr for VersionedUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionedUri {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<VersionedUri> for String {
    fn from(uri: VersionedUri) -> Self {
        uri.to_string()
    }
}
