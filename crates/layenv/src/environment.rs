// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! The top-level environment model.

use crate::component::Component;
use crate::descriptor::EnvDescriptor;
use crate::location::DescriptorLocation;
use crate::nodes::NodeSets;
use crate::platform::Platform;
use crate::provider::Providers;
use crate::qualified::{ensure_related, is_valid_qualifier, Describable, QualifiedName};
use crate::validation::{Validate, ValidationErrors};

#[cfg(test)]
#[path = "./environment_test.rs"]
mod environment_test;

/// An environment composed from one or more layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// May be empty for a fragment meant to be imported.
    pub name: String,
    pub qualifier: Option<String>,
    pub description: Option<String>,
    pub platform: Platform,
    pub providers: Providers,
    pub node_sets: NodeSets,
}

impl Environment {
    /// Build the entities declared by a single layer.
    ///
    /// References are recorded but not resolved, the components they point
    /// at may come from another layer.
    pub fn from_descriptor(descriptor: &EnvDescriptor) -> Self {
        let root = DescriptorLocation::root();
        Self {
            name: descriptor.name.clone(),
            qualifier: descriptor.qualifier.clone().filter(|q| !q.is_empty()),
            description: descriptor.description.clone(),
            platform: Platform::from_descriptor(&descriptor.platform, root.append_path("platform")),
            providers: Providers::from_descriptor(
                &descriptor.providers,
                root.append_path("providers"),
            ),
            node_sets: NodeSets::from_descriptor(&descriptor.nodes, root.append_path("nodes")),
        }
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.name.clone(), self.qualifier.clone())
    }

    /// Fold in an imported environment; values already defined here win.
    pub fn merge(&self, other: &Self) -> crate::Result<Self> {
        self.ensure_related(other)?;
        Ok(Self {
            name: self.adopt_name(other),
            qualifier: self.qualifier.clone().or_else(|| other.qualifier.clone()),
            description: self.description.clone().or_else(|| other.description.clone()),
            platform: self.platform.merge(&other.platform)?,
            providers: self.providers.merge(&other.providers)?,
            node_sets: self.node_sets.merge(&other.node_sets)?,
        })
    }

    /// Fold in a customization layer; values it defines win.
    pub fn customize(&self, other: &Self) -> crate::Result<Self> {
        self.ensure_related(other)?;
        Ok(Self {
            name: self.adopt_name(other),
            qualifier: other.qualifier.clone().or_else(|| self.qualifier.clone()),
            description: other.description.clone().or_else(|| self.description.clone()),
            platform: self.platform.customize(&other.platform)?,
            providers: self.providers.customize(&other.providers)?,
            node_sets: self.node_sets.customize(&other.node_sets)?,
        })
    }

    /// An unnamed side takes the identity of the other one.
    fn ensure_related(&self, other: &Self) -> crate::Result<()> {
        if self.name.is_empty() || other.name.is_empty() {
            return Ok(());
        }
        ensure_related(self, other)
    }

    fn adopt_name(&self, other: &Self) -> String {
        if self.name.is_empty() {
            other.name.clone()
        } else {
            self.name.clone()
        }
    }

    /// Check the whole tree, reporting every problem found.
    ///
    /// Diagnostics are ordered as visited: name, qualifier, platform,
    /// providers, node sets.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let root = DescriptorLocation::root();
        if self.name.is_empty() {
            errors.add_error("the environment name is not set", &root.append_path("name"));
        } else if !is_valid_qualifier(&self.name) {
            errors.add_error(
                format!("invalid environment name: '{}'", self.name),
                &root.append_path("name"),
            );
        }
        if let Some(qualifier) = &self.qualifier {
            if !is_valid_qualifier(qualifier) {
                errors.add_error(
                    format!("invalid environment qualifier: '{qualifier}'"),
                    &root.append_path("qualifier"),
                );
            }
        }
        errors.merge(self.platform.validate(self));
        errors.merge(self.providers.validate(self));
        errors.merge(self.node_sets.validate(self));
        errors
    }

    /// The components actually used by the distribution, the orchestrator
    /// and the providers, deduplicated by id in first-use order.
    pub fn used_components(&self) -> crate::Result<Vec<&Component>> {
        let references = [
            &self.platform.distribution.component,
            &self.platform.orchestrator,
        ]
        .into_iter()
        .chain(self.providers.iter().map(|p| &p.component));

        let mut used: Vec<&Component> = Vec::new();
        for reference in references {
            if let Some(component) = reference.resolve(&self.platform.components)? {
                if !used.iter().any(|c| c.id == component.id) {
                    used.push(component);
                }
            }
        }
        Ok(used)
    }
}

impl Describable for Environment {
    fn describe_type(&self) -> &'static str {
        "environment"
    }

    fn describe_name(&self) -> String {
        self.name.clone()
    }
}
