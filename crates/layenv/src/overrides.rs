// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Key/value blocks that compose across layers.
//!
//! Parameters, environment variables, proxy settings and repository
//! authentication are all plain maps. Two maps combine in one of two
//! directions:
//!
//! - [`Overrides::inherit`]: the receiver is the higher priority layer and
//!   only fills in what it does not already define.
//! - [`Overrides::override_with`]: the argument is the higher priority layer
//!   and replaces any key it defines.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "./overrides_test.rs"]
mod overrides_test;

/// Opaque parameters handed to components.
pub type Parameters = Overrides<serde_yaml::Value>;

/// Environment variables exported to components.
pub type EnvVars = Overrides<String>;

/// Proxy settings (`http_proxy`, `https_proxy`, `no_proxy`).
pub type Proxy = Overrides<String>;

/// Repository authentication settings (`method`, `user`, `password`, ...).
pub type Auth = Overrides<String>;

pub const HTTP_PROXY_KEY: &str = "http_proxy";
pub const HTTPS_PROXY_KEY: &str = "https_proxy";
pub const NO_PROXY_KEY: &str = "no_proxy";

/// An ordered map whose keys are compared exactly.
///
/// Absence is always represented by a missing key, never by a stored
/// null-like value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Overrides<V> {
    values: BTreeMap<String, V>,
}

impl<V> Default for Overrides<V> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<V: Clone> Overrides<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine with a lower priority `base`: keys of `self` win.
    pub fn inherit(&self, base: &Self) -> Self {
        let mut values = base.values.clone();
        values.extend(self.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { values }
    }

    /// Combine with a higher priority `with`: keys of `with` win.
    pub fn override_with(&self, with: &Self) -> Self {
        with.inherit(self)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: V) -> Option<V> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, V> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Overrides<serde_yaml::Value> {
    /// Build parameters from a descriptor block, dropping null values.
    pub fn from_values(block: &IndexMap<String, serde_yaml::Value>) -> Self {
        block
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl Overrides<String> {
    /// Build a string block from a descriptor block, dropping `~` entries.
    pub fn from_optional(block: &IndexMap<String, Option<String>>) -> Self {
        block
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.clone())))
            .collect()
    }

    pub fn http_proxy(&self) -> Option<&str> {
        self.get(HTTP_PROXY_KEY).map(String::as_str)
    }

    pub fn https_proxy(&self) -> Option<&str> {
        self.get(HTTPS_PROXY_KEY).map(String::as_str)
    }

    pub fn no_proxy(&self) -> Option<&str> {
        self.get(NO_PROXY_KEY).map(String::as_str)
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Overrides<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'a, V> IntoIterator for &'a Overrides<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = std::collections::btree_map::Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
