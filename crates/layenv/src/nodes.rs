// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Sets of identical nodes created through a provider.

use indexmap::IndexMap;

use crate::descriptor::NodeSetDescriptor;
use crate::location::DescriptorLocation;
use crate::provider::ProviderRef;
use crate::qualified::{ensure_related, is_valid_qualifier, Describable};
use crate::validation::{Validate, ValidationErrors};
use crate::Environment;

#[cfg(test)]
#[path = "./nodes_test.rs"]
mod nodes_test;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeSet {
    pub name: String,
    /// Number of nodes; zero means not specified by this layer.
    pub instances: u32,
    pub provider: ProviderRef,
    pub location: DescriptorLocation,
}

impl NodeSet {
    pub fn from_descriptor(
        name: &str,
        descriptor: &NodeSetDescriptor,
        location: DescriptorLocation,
    ) -> Self {
        Self {
            name: name.to_string(),
            instances: descriptor.instances,
            provider: ProviderRef::from_descriptor(
                &descriptor.provider,
                location.append_path("provider"),
            ),
            location,
        }
    }

    pub fn merge(&self, other: &Self) -> crate::Result<Self> {
        ensure_related(self, other)?;
        let instances = if self.instances > 0 {
            self.instances
        } else {
            other.instances
        };
        Ok(Self {
            name: self.name.clone(),
            instances,
            provider: self.provider.merge(&other.provider),
            location: self.location.clone(),
        })
    }

    pub fn customize(&self, other: &Self) -> crate::Result<Self> {
        ensure_related(self, other)?;
        let instances = if other.instances > 0 {
            other.instances
        } else {
            self.instances
        };
        Ok(Self {
            name: self.name.clone(),
            instances,
            provider: self.provider.customize(&other.provider),
            location: self.location.clone(),
        })
    }
}

impl Describable for NodeSet {
    fn describe_type(&self) -> &'static str {
        "node set"
    }

    fn describe_name(&self) -> String {
        self.name.clone()
    }
}

impl Validate for NodeSet {
    fn validate(&self, env: &Environment) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if !is_valid_qualifier(&self.name) {
            errors.add_error(format!("invalid node set name: '{}'", self.name), &self.location);
        }
        if self.instances == 0 {
            errors.add_error(
                "the number of instances must be greater than zero",
                &self.location.append_path("instances"),
            );
        }
        errors.merge(self.provider.validate(env));
        errors
    }
}

/// The node sets of an environment, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSets {
    node_sets: IndexMap<String, NodeSet>,
}

impl NodeSets {
    pub fn from_descriptor(
        descriptors: &IndexMap<String, NodeSetDescriptor>,
        location: DescriptorLocation,
    ) -> Self {
        Self {
            node_sets: descriptors
                .iter()
                .map(|(name, d)| {
                    (
                        name.clone(),
                        NodeSet::from_descriptor(name, d, location.append_path(name)),
                    )
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&NodeSet> {
        self.node_sets.get(name)
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, NodeSet> {
        self.node_sets.values()
    }

    pub fn len(&self) -> usize {
        self.node_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_sets.is_empty()
    }

    /// Total number of nodes across every set.
    pub fn instance_count(&self) -> u64 {
        self.node_sets.values().map(|n| u64::from(n.instances)).sum()
    }

    pub fn merge(&self, other: &Self) -> crate::Result<Self> {
        let mut node_sets = self.node_sets.clone();
        for (name, node_set) in &other.node_sets {
            let folded = match node_sets.get(name) {
                Some(existing) => existing.merge(node_set)?,
                None => node_set.clone(),
            };
            node_sets.insert(name.clone(), folded);
        }
        Ok(Self { node_sets })
    }

    pub fn customize(&self, other: &Self) -> crate::Result<Self> {
        let mut node_sets = self.node_sets.clone();
        for (name, node_set) in &other.node_sets {
            let folded = match node_sets.get(name) {
                Some(existing) => existing.customize(node_set)?,
                None => node_set.clone(),
            };
            node_sets.insert(name.clone(), folded);
        }
        Ok(Self { node_sets })
    }
}

impl Validate for NodeSets {
    fn validate(&self, env: &Environment) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for node_set in self.node_sets.values() {
            errors.merge(node_set.validate(env));
        }
        errors
    }
}
