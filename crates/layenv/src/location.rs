// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Dotted paths pointing into a descriptor document.

use std::fmt;

#[cfg(test)]
#[path = "./location_test.rs"]
mod location_test;

/// The place in a descriptor where a value was declared.
///
/// Locations are values: [`DescriptorLocation::append_path`] returns a new
/// location and leaves its parent untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DescriptorLocation {
    segments: Vec<String>,
}

impl DescriptorLocation {
    /// The location of the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// A location made of the given segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Derive a child location with `segment` appended.
    pub fn append_path<S: Into<String>>(&self, segment: S) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for DescriptorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&DescriptorLocation> for String {
    fn from(value: &DescriptorLocation) -> Self {
        value.to_string()
    }
}
