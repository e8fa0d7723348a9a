// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Components, the registry they live in and lazy references to them.
//!
//! A [`ComponentRef`] only records the id of its target. It is built while a
//! layer is being read, usually before the component it names has been
//! composed, and is resolved later against the [`ComponentRegistry`] of the
//! fully composed platform.

use std::path::Path;

use indexmap::IndexMap;
use url::Url;

use crate::descriptor::ComponentDescriptor;
use crate::location::DescriptorLocation;
use crate::overrides::Auth;
use crate::platform::Base;
use crate::qualified::{ensure_related, is_valid_qualifier, Describable};
use crate::validation::{Validate, ValidationError, ValidationErrors};
use crate::Environment;

#[cfg(test)]
#[path = "./component_test.rs"]
mod component_test;

/// Where the sources of a component come from.
///
/// The url and auth are kept as declared. The platform base is only applied
/// by [`Repository::resolved_url`] and [`Repository::effective_auth`], once
/// every layer has been composed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Repository {
    /// Absolute url, or a path relative to the platform base.
    pub url: String,
    /// Branch, tag or commit.
    pub git_ref: Option<String>,
    pub auth: Auth,
}

impl Repository {
    pub fn new<S: Into<String>>(url: S, git_ref: Option<String>, auth: Auth) -> Self {
        Self {
            url: url.into(),
            git_ref,
            auth,
        }
    }

    /// The url with relative paths resolved against `base`.
    pub fn resolved_url(&self, base: &Base) -> String {
        resolve_repository_url(base.repository.as_deref(), &self.url)
    }

    /// The repository auth, completed by the base defaults.
    pub fn effective_auth(&self, base: &Base) -> Auth {
        self.auth.inherit(&base.auth)
    }
}

fn resolve_repository_url(base: Option<&str>, raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match Url::parse(raw) {
        Ok(_) => raw.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) if Path::new(raw).is_absolute() => {
            Url::from_file_path(raw)
                .map(String::from)
                .unwrap_or_else(|_| raw.to_string())
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let Some(base) = base else {
                return raw.to_string();
            };
            // a trailing slash keeps the last base segment when joining
            let base = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{base}/")
            };
            Url::parse(&base)
                .and_then(|b| b.join(raw))
                .map(String::from)
                .unwrap_or_else(|_| raw.to_string())
        }
        Err(_) => raw.to_string(),
    }
}

/// A versioned unit of deployable content, identified by its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub repository: Repository,
    pub location: DescriptorLocation,
}

impl Component {
    pub fn new<S: Into<String>>(id: S, repository: Repository, location: DescriptorLocation) -> Self {
        Self {
            id: id.into(),
            repository,
            location,
        }
    }

    pub fn from_descriptor(
        id: &str,
        descriptor: &ComponentDescriptor,
        location: DescriptorLocation,
    ) -> Self {
        let repository = Repository::new(
            descriptor.repository.clone(),
            descriptor.git_ref.clone(),
            Auth::from_optional(&descriptor.auth),
        );
        Self::new(id, repository, location)
    }

    /// The repository url resolved against the base of the environment.
    pub fn resolved_url(&self, env: &Environment) -> String {
        self.repository.resolved_url(&env.platform.base)
    }

    /// Combine with the same component found in an imported layer.
    pub fn merge(&self, other: &Self) -> crate::Result<Self> {
        ensure_related(self, other)?;
        let mut merged = self.clone();
        if merged.repository.url.is_empty() {
            merged.repository.url = other.repository.url.clone();
        }
        if merged.repository.git_ref.is_none() {
            merged.repository.git_ref = other.repository.git_ref.clone();
        }
        merged.repository.auth = self.repository.auth.inherit(&other.repository.auth);
        Ok(merged)
    }

    /// Specialize this component with a customization layer.
    pub fn customize(&self, other: &Self) -> crate::Result<Self> {
        ensure_related(self, other)?;
        let mut customized = self.clone();
        if !other.repository.url.is_empty() {
            customized.repository.url = other.repository.url.clone();
            customized.location = other.location.clone();
        }
        if other.repository.git_ref.is_some() {
            customized.repository.git_ref = other.repository.git_ref.clone();
        }
        customized.repository.auth = self.repository.auth.override_with(&other.repository.auth);
        Ok(customized)
    }
}

impl Describable for Component {
    fn describe_type(&self) -> &'static str {
        "component"
    }

    fn describe_name(&self) -> String {
        self.id.clone()
    }
}

impl Validate for Component {
    fn validate(&self, env: &Environment) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if !is_valid_qualifier(&self.id) {
            errors.add_error(format!("invalid component id: '{}'", self.id), &self.location);
        }
        let repository = self.location.append_path("repository");
        let url = self.resolved_url(env);
        if url.is_empty() {
            errors.add_error("the component repository is not set", &repository);
        } else if let Err(err) = Url::parse(&url) {
            errors.add_error(format!("invalid repository url '{url}': {err}"), &repository);
        }
        errors
    }
}

/// All components declared by an environment, keyed by id.
///
/// Iteration follows declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentRegistry {
    components: IndexMap<String, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// Register a component, replacing any previous one with the same id.
    pub fn insert(&mut self, component: Component) -> Option<Component> {
        self.components.insert(component.id.clone(), component)
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, Component> {
        self.components.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<Component> for ComponentRegistry {
    fn from_iter<T: IntoIterator<Item = Component>>(iter: T) -> Self {
        let mut registry = Self::new();
        for component in iter {
            registry.insert(component);
        }
        registry
    }
}

/// A by-id pointer to a component, resolved on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRef {
    id: Option<String>,
    mandatory: bool,
    location: DescriptorLocation,
}

impl ComponentRef {
    /// A reference that must resolve once composition is complete.
    pub fn mandatory(id: Option<String>, location: DescriptorLocation) -> Self {
        Self::new(id, true, location)
    }

    /// A reference that may be left unset.
    pub fn optional(id: Option<String>, location: DescriptorLocation) -> Self {
        Self::new(id, false, location)
    }

    fn new(id: Option<String>, mandatory: bool, location: DescriptorLocation) -> Self {
        Self {
            id: id.filter(|id| !id.is_empty()),
            mandatory,
            location,
        }
    }

    /// The id of the target component, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn location(&self) -> &DescriptorLocation {
        &self.location
    }

    /// Look the target up in `registry`.
    ///
    /// Optional references that are unset or unknown resolve to `None`.
    pub fn resolve<'a>(
        &self,
        registry: &'a ComponentRegistry,
    ) -> Result<Option<&'a Component>, ValidationError> {
        let Some(id) = &self.id else {
            if self.mandatory {
                return Err(ValidationError::error(
                    "component reference is not set",
                    &self.location,
                ));
            }
            return Ok(None);
        };
        match registry.get(id) {
            Some(component) => Ok(Some(component)),
            None if self.mandatory => Err(ValidationError::error(
                format!("unknown component reference: {id}"),
                &self.location,
            )),
            None => Ok(None),
        }
    }

    /// Keep the current target, adopting the other's only when unset.
    pub fn merge(&self, other: &Self) -> Self {
        if self.is_set() {
            return self.clone();
        }
        Self {
            mandatory: self.mandatory || other.mandatory,
            ..other.clone()
        }
    }

    /// Re-target to the other's component when it names one.
    pub fn customize(&self, other: &Self) -> Self {
        if !other.is_set() {
            return self.clone();
        }
        Self {
            mandatory: self.mandatory || other.mandatory,
            ..other.clone()
        }
    }
}

impl Validate for ComponentRef {
    fn validate(&self, env: &Environment) -> ValidationErrors {
        match self.resolve(&env.platform.components) {
            Err(err) => err.into(),
            Ok(None) if self.is_set() => ValidationError::warning(
                format!("unknown optional component reference: {}", self.id().unwrap_or_default()),
                &self.location,
            )
            .into(),
            Ok(_) => ValidationErrors::new(),
        }
    }
}
