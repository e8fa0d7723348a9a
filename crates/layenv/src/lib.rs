// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! layenv - Layered Environment Descriptor Composition
//!
//! This crate composes an environment model from a base descriptor, the
//! descriptors it imports and any number of customization layers, then
//! validates the result in a single pass.
//!
//! # Overview
//!
//! Two operators combine the same entity found in two layers:
//!
//! - `merge` folds an imported layer in; what is already defined wins.
//! - `customize` folds a customization layer in; what it defines wins.
//!
//! Entities refer to components by id only. References are resolved against
//! the component registry of the platform once every layer has been folded,
//! so a provider may name a component declared in another layer.
//! Validation collects every problem into one [`ValidationErrors`] report
//! instead of failing on the first.
//!
//! # Example
//!
//! ```yaml
//! # environment.yaml
//! name: demo
//! qualifier: dev
//! imports:
//!   - ./common.yaml
//! platform:
//!   base: https://github.com
//!   distribution:
//!     component: distrib
//!   components:
//!     distrib:
//!       repository: acme/distribution
//!       ref: v1.0.0
//!     aws:
//!       repository: acme/aws-provider
//! providers:
//!   aws:
//!     component: aws
//!     params:
//!       region: eu-west-1
//! ```

pub mod component;
pub mod compose;
pub mod descriptor;
pub mod environment;
pub mod error;
pub mod loader;
pub mod location;
pub mod nodes;
pub mod overrides;
pub mod platform;
pub mod provider;
pub mod qualified;
pub mod validation;

pub use component::{Component, ComponentRef, ComponentRegistry, Repository};
pub use compose::{compose_descriptors, compose_layer, compose_layers, ComposedEnvironment, Layer};
pub use descriptor::{ApiVersion, EnvDescriptor};
pub use environment::Environment;
pub use error::{Error, Result};
pub use loader::{load_layers, LoadOptions, LoadedLayers};
pub use location::DescriptorLocation;
pub use nodes::{NodeSet, NodeSets};
pub use overrides::{Auth, EnvVars, Overrides, Parameters, Proxy};
pub use platform::{Base, Distribution, Platform};
pub use provider::{Provider, ProviderRef, Providers};
pub use qualified::{is_valid_qualifier, Describable, QualifiedName};
pub use validation::{Severity, Validate, ValidationError, ValidationErrors};

/// Well-known filename for environment descriptors.
pub const DESCRIPTOR_FILENAME: &str = "environment.yaml";
