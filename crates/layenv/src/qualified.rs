// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Names and qualifiers of environments and their entities.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

#[cfg(test)]
#[path = "./qualified_test.rs"]
mod qualified_test;

static QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^[a-zA-Z0-9_]+$").expect("qualifier pattern is a valid regex")
});

/// True if `name` is non-empty and made only of ASCII letters, digits and `_`.
pub fn is_valid_qualifier(name: &str) -> bool {
    QUALIFIER.is_match(name)
}

/// The name of an environment, optionally specialized by a qualifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub name: String,
    pub qualifier: Option<String>,
}

impl QualifiedName {
    pub fn new<N: Into<String>>(name: N, qualifier: Option<String>) -> Self {
        Self {
            name: name.into(),
            qualifier: qualifier.filter(|q| !q.is_empty()),
        }
    }

    /// True if both parts would be accepted by [`is_valid_qualifier`].
    pub fn is_valid(&self) -> bool {
        is_valid_qualifier(&self.name)
            && self.qualifier.as_deref().is_none_or(is_valid_qualifier)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.qualifier.is_none()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}_{}", self.name, qualifier),
            None => f.write_str(&self.name),
        }
    }
}

/// Uniform type and name reporting shared by every entity.
pub trait Describable {
    /// A short, lowercase kind, such as `provider`.
    fn describe_type(&self) -> &'static str;

    /// The identity of this entity within its collection.
    fn describe_name(&self) -> String;
}

/// Fail unless both entities share the same identity.
pub(crate) fn ensure_related<T: Describable>(left: &T, right: &T) -> crate::Result<()> {
    let (l, r) = (left.describe_name(), right.describe_name());
    if l != r {
        return Err(crate::Error::UnrelatedEntities {
            kind: left.describe_type(),
            left: l,
            right: r,
        });
    }
    Ok(())
}
