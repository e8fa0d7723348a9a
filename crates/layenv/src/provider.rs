// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Infrastructure providers and references to them.

use indexmap::IndexMap;

use crate::component::ComponentRef;
use crate::descriptor::{ProviderDescriptor, ProviderRefDescriptor};
use crate::location::DescriptorLocation;
use crate::overrides::{EnvVars, Parameters, Proxy};
use crate::qualified::{ensure_related, is_valid_qualifier, Describable};
use crate::validation::{Validate, ValidationError, ValidationErrors};
use crate::Environment;

#[cfg(test)]
#[path = "./provider_test.rs"]
mod provider_test;

/// A named provider, implemented by a component of the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Provider {
    pub name: String,
    pub component: ComponentRef,
    pub parameters: Parameters,
    pub env_vars: EnvVars,
    pub proxy: Proxy,
    pub location: DescriptorLocation,
}

impl Provider {
    pub fn from_descriptor(
        name: &str,
        descriptor: &ProviderDescriptor,
        location: DescriptorLocation,
    ) -> Self {
        Self {
            name: name.to_string(),
            component: ComponentRef::mandatory(
                descriptor.component.clone(),
                location.append_path("component"),
            ),
            parameters: Parameters::from_values(&descriptor.params),
            env_vars: EnvVars::from_optional(&descriptor.env),
            proxy: Proxy::from_optional(&descriptor.proxy),
            location,
        }
    }

    /// Combine with the same provider found in an imported layer.
    pub fn merge(&self, other: &Self) -> crate::Result<Self> {
        ensure_related(self, other)?;
        Ok(Self {
            name: self.name.clone(),
            component: self.component.merge(&other.component),
            parameters: self.parameters.inherit(&other.parameters),
            env_vars: self.env_vars.inherit(&other.env_vars),
            proxy: self.proxy.inherit(&other.proxy),
            location: self.location.clone(),
        })
    }

    /// Specialize this provider with a customization layer.
    pub fn customize(&self, other: &Self) -> crate::Result<Self> {
        ensure_related(self, other)?;
        Ok(Self {
            name: self.name.clone(),
            component: self.component.customize(&other.component),
            parameters: self.parameters.override_with(&other.parameters),
            env_vars: self.env_vars.override_with(&other.env_vars),
            proxy: self.proxy.override_with(&other.proxy),
            location: self.location.clone(),
        })
    }
}

impl Describable for Provider {
    fn describe_type(&self) -> &'static str {
        "provider"
    }

    fn describe_name(&self) -> String {
        self.name.clone()
    }
}

impl Validate for Provider {
    fn validate(&self, env: &Environment) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if !is_valid_qualifier(&self.name) {
            errors.add_error(format!("invalid provider name: '{}'", self.name), &self.location);
        }
        errors.merge(self.component.validate(env));
        errors
    }
}

/// The providers of an environment, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Providers {
    providers: IndexMap<String, Provider>,
}

impl Providers {
    pub fn from_descriptor(
        descriptors: &IndexMap<String, ProviderDescriptor>,
        location: DescriptorLocation,
    ) -> Self {
        descriptors
            .iter()
            .map(|(name, d)| Provider::from_descriptor(name, d, location.append_path(name)))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Provider> {
        self.providers.get(name)
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, Provider> {
        self.providers.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Fold existing providers with entity merge and add new ones.
    pub fn merge(&self, other: &Self) -> crate::Result<Self> {
        let mut providers = self.providers.clone();
        for (name, provider) in &other.providers {
            let folded = match providers.get(name) {
                Some(existing) => existing.merge(provider)?,
                None => provider.clone(),
            };
            providers.insert(name.clone(), folded);
        }
        Ok(Self { providers })
    }

    /// Fold existing providers with entity customize and add new ones.
    pub fn customize(&self, other: &Self) -> crate::Result<Self> {
        let mut providers = self.providers.clone();
        for (name, provider) in &other.providers {
            let folded = match providers.get(name) {
                Some(existing) => existing.customize(provider)?,
                None => provider.clone(),
            };
            providers.insert(name.clone(), folded);
        }
        Ok(Self { providers })
    }
}

impl FromIterator<Provider> for Providers {
    fn from_iter<T: IntoIterator<Item = Provider>>(iter: T) -> Self {
        Self {
            providers: iter.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }
}

impl Validate for Providers {
    fn validate(&self, env: &Environment) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.providers.is_empty() {
            errors.add_warning(
                "no provider specified",
                &DescriptorLocation::root().append_path("providers"),
            );
        }
        for provider in self.providers.values() {
            errors.merge(provider.validate(env));
        }
        errors
    }
}

/// A by-name use of a provider with per-use overrides.
///
/// The blocks of a reference inherit from the blocks of the provider it
/// points at, see [`ProviderRef::effective_parameters`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRef {
    pub name: Option<String>,
    pub parameters: Parameters,
    pub env_vars: EnvVars,
    pub proxy: Proxy,
    pub location: DescriptorLocation,
}

impl ProviderRef {
    pub fn from_descriptor(descriptor: &ProviderRefDescriptor, location: DescriptorLocation) -> Self {
        Self {
            name: descriptor.name.clone().filter(|n| !n.is_empty()),
            parameters: Parameters::from_values(&descriptor.params),
            env_vars: EnvVars::from_optional(&descriptor.env),
            proxy: Proxy::from_optional(&descriptor.proxy),
            location,
        }
    }

    pub fn resolve<'a>(&self, providers: &'a Providers) -> Result<&'a Provider, ValidationError> {
        let Some(name) = &self.name else {
            return Err(ValidationError::error("empty provider reference", &self.location));
        };
        providers.get(name).ok_or_else(|| {
            ValidationError::error(
                format!("unknown provider reference: {name}"),
                &self.location.append_path("name"),
            )
        })
    }

    pub fn effective_parameters(&self, provider: &Provider) -> Parameters {
        self.parameters.inherit(&provider.parameters)
    }

    pub fn effective_env_vars(&self, provider: &Provider) -> EnvVars {
        self.env_vars.inherit(&provider.env_vars)
    }

    pub fn effective_proxy(&self, provider: &Provider) -> Proxy {
        self.proxy.inherit(&provider.proxy)
    }

    pub fn merge(&self, other: &Self) -> Self {
        Self {
            name: self.name.clone().or_else(|| other.name.clone()),
            parameters: self.parameters.inherit(&other.parameters),
            env_vars: self.env_vars.inherit(&other.env_vars),
            proxy: self.proxy.inherit(&other.proxy),
            location: self.location.clone(),
        }
    }

    pub fn customize(&self, other: &Self) -> Self {
        Self {
            name: other.name.clone().or_else(|| self.name.clone()),
            parameters: self.parameters.override_with(&other.parameters),
            env_vars: self.env_vars.override_with(&other.env_vars),
            proxy: self.proxy.override_with(&other.proxy),
            location: self.location.clone(),
        }
    }
}

impl Validate for ProviderRef {
    fn validate(&self, env: &Environment) -> ValidationErrors {
        match self.resolve(&env.providers) {
            Ok(_) => ValidationErrors::new(),
            Err(err) => err.into(),
        }
    }
}
