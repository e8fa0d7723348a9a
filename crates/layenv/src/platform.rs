// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! The platform: shared base settings, the distribution and the component
//! registry every reference in an environment resolves against.

use crate::component::{Component, ComponentRef, ComponentRegistry};
use crate::descriptor::{DistributionDescriptor, PlatformDescriptor};
use crate::location::DescriptorLocation;
use crate::overrides::{Auth, EnvVars, Parameters};
use crate::validation::{Validate, ValidationErrors};
use crate::Environment;

#[cfg(test)]
#[path = "./platform_test.rs"]
mod platform_test;

/// Settings shared by every component of the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Base {
    /// Url relative component repositories are resolved against.
    pub repository: Option<String>,
    /// Authentication inherited by every component repository.
    pub auth: Auth,
}

impl Base {
    pub fn from_descriptor(descriptor: &PlatformDescriptor) -> Self {
        Self {
            repository: descriptor.base.clone().filter(|b| !b.is_empty()),
            auth: Auth::from_optional(&descriptor.auth),
        }
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            repository: self.repository.clone().or_else(|| other.repository.clone()),
            auth: self.auth.inherit(&other.auth),
        }
    }

    pub fn customize(&self, other: &Self) -> Self {
        Self {
            repository: other.repository.clone().or_else(|| self.repository.clone()),
            auth: self.auth.override_with(&other.auth),
        }
    }
}

/// The component providing the base system of every node.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub component: ComponentRef,
    pub parameters: Parameters,
    pub env_vars: EnvVars,
}

impl Distribution {
    pub fn from_descriptor(
        descriptor: Option<&DistributionDescriptor>,
        location: DescriptorLocation,
    ) -> Self {
        let component = ComponentRef::mandatory(
            descriptor.and_then(|d| d.component.clone()),
            location.append_path("component"),
        );
        match descriptor {
            Some(d) => Self {
                component,
                parameters: Parameters::from_values(&d.params),
                env_vars: EnvVars::from_optional(&d.env),
            },
            None => Self {
                component,
                parameters: Parameters::new(),
                env_vars: EnvVars::new(),
            },
        }
    }

    /// A distribution is set once it names its component.
    pub fn is_set(&self) -> bool {
        self.component.is_set()
    }

    pub fn merge(&self, other: &Self) -> Self {
        if !self.is_set() {
            return other.clone();
        }
        Self {
            component: self.component.merge(&other.component),
            parameters: self.parameters.inherit(&other.parameters),
            env_vars: self.env_vars.inherit(&other.env_vars),
        }
    }

    pub fn customize(&self, other: &Self) -> Self {
        Self {
            component: self.component.customize(&other.component),
            parameters: self.parameters.override_with(&other.parameters),
            env_vars: self.env_vars.override_with(&other.env_vars),
        }
    }
}

impl Validate for Distribution {
    fn validate(&self, env: &Environment) -> ValidationErrors {
        self.component.validate(env)
    }
}

/// Everything an environment is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub base: Base,
    pub distribution: Distribution,
    /// Component deploying the stacks onto the nodes, if any.
    pub orchestrator: ComponentRef,
    pub components: ComponentRegistry,
}

impl Platform {
    pub fn from_descriptor(descriptor: &PlatformDescriptor, location: DescriptorLocation) -> Self {
        let base = Base::from_descriptor(descriptor);
        let distribution = Distribution::from_descriptor(
            descriptor.distribution.as_ref(),
            location.append_path("distribution"),
        );
        let orchestrator = ComponentRef::optional(
            descriptor.orchestrator.clone(),
            location.append_path("orchestrator"),
        );
        let components_location = location.append_path("components");
        let components = descriptor
            .components
            .iter()
            .map(|(id, c)| Component::from_descriptor(id, c, components_location.append_path(id)))
            .collect();
        Self {
            base,
            distribution,
            orchestrator,
            components,
        }
    }

    /// Fold in the platform of an imported layer.
    ///
    /// Known components only take what they leave unset from the imported
    /// ones, new ids are appended. The distribution is taken as a whole when
    /// this one is unset.
    pub fn merge(&self, other: &Self) -> crate::Result<Self> {
        let mut components = self.components.clone();
        for component in other.components.iter() {
            let Some(existing) = components.get(&component.id) else {
                components.insert(component.clone());
                continue;
            };
            tracing::trace!(id = %component.id, "component already declared, filling gaps");
            let folded = existing.merge(component)?;
            components.insert(folded);
        }
        Ok(Self {
            base: self.base.merge(&other.base),
            distribution: self.distribution.merge(&other.distribution),
            orchestrator: self.orchestrator.merge(&other.orchestrator),
            components,
        })
    }

    /// Fold in the platform of a customization layer.
    pub fn customize(&self, other: &Self) -> crate::Result<Self> {
        let mut components = self.components.clone();
        for component in other.components.iter() {
            let folded = match components.get(&component.id) {
                Some(existing) => existing.customize(component)?,
                None => component.clone(),
            };
            components.insert(folded);
        }
        Ok(Self {
            base: self.base.customize(&other.base),
            distribution: self.distribution.customize(&other.distribution),
            orchestrator: self.orchestrator.customize(&other.orchestrator),
            components,
        })
    }
}

impl Validate for Platform {
    fn validate(&self, env: &Environment) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for component in self.components.iter() {
            errors.merge(component.validate(env));
        }
        errors.merge(self.distribution.validate(env));
        errors.merge(self.orchestrator.validate(env));
        errors
    }
}
