//! Entity property maps.
//!
//! Properties are keyed by the property type's base URI and hold arbitrary
//! JSON values. Mutation goes through copy-on-write builders returning new
//! maps; older entity versions keep their maps untouched.

use crate::BaseUri;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The property map of one entity version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<BaseUri, serde_json::Value>);

impl Properties {
    /// Creates an empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for a property type base URI.
    #[must_use]
    pub fn get(&self, base_uri: &BaseUri) -> Option<&serde_json::Value> {
        self.0.get(base_uri)
    }

    /// Returns a new map with one property set, leaving `self` consumed.
    /// Chainable builder; last write wins per key.
    #[must_use]
    pub fn with_property(mut self, base_uri: BaseUri, value: serde_json::Value) -> Self {
        self.0.insert(base_uri, value);
        self
    }

    /// Returns a new map with every entry of `other` applied over `self`.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        for (base_uri, value) in &other.0 {
            merged.insert(base_uri.clone(), value.clone());
        }
        Self(merged)
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BaseUri, &serde_json::Value)> {
        self.0.iter()
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the map holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(BaseUri, serde_json::Value)> for Properties {
    fn from_iter<I: IntoIterator<Item = (BaseUri, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
