// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Composition of layers into a single environment.
//!
//! Layers are folded in a fixed order:
//!
//! 1. every layer is first merged with its imports, depth first, in
//!    declaration order; the importing layer wins over what it imports
//! 2. customization layers are then applied on top of the base layer, in
//!    declaration order; each one wins over everything before it

use std::path::PathBuf;

use crate::descriptor::EnvDescriptor;
use crate::validation::ValidationErrors;
use crate::Environment;

#[cfg(test)]
#[path = "./compose_test.rs"]
mod compose_test;

/// A descriptor together with the descriptors it imports.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub descriptor: EnvDescriptor,
    pub imports: Vec<Layer>,
}

impl Layer {
    pub fn new(descriptor: EnvDescriptor) -> Self {
        Self {
            descriptor,
            imports: Vec::new(),
        }
    }

    pub fn with_imports(descriptor: EnvDescriptor, imports: Vec<Layer>) -> Self {
        Self {
            descriptor,
            imports,
        }
    }

    /// Source files of this layer and its imports, in folding order.
    pub fn source_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.descriptor.source_path.iter().cloned().collect();
        for import in &self.imports {
            files.extend(import.source_files());
        }
        files
    }
}

/// Environment composed from a base layer and its customizations.
#[derive(Debug, Clone)]
pub struct ComposedEnvironment {
    pub environment: Environment,

    /// Source files that contributed to this composition.
    pub source_files: Vec<PathBuf>,
}

impl ComposedEnvironment {
    /// Validate the composed environment.
    pub fn validate(&self) -> ValidationErrors {
        self.environment.validate()
    }

    /// Get the number of source files.
    pub fn source_count(&self) -> usize {
        self.source_files.len()
    }
}

/// Build one layer, merging its imports into it.
pub fn compose_layer(layer: &Layer) -> crate::Result<Environment> {
    let mut environment = Environment::from_descriptor(&layer.descriptor);
    for import in &layer.imports {
        let imported = compose_layer(import)?;
        tracing::debug!(
            source = ?import.descriptor.source_path,
            "merging imported layer"
        );
        environment = environment.merge(&imported)?;
    }
    Ok(environment)
}

/// Compose a base layer and customization layers into one environment.
///
/// The first failing fold aborts composition.
pub fn compose_layers(base: &Layer, customizations: &[Layer]) -> crate::Result<ComposedEnvironment> {
    let mut environment = compose_layer(base)?;
    let mut source_files = base.source_files();

    for layer in customizations {
        let customization = compose_layer(layer)?;
        tracing::debug!(
            source = ?layer.descriptor.source_path,
            "applying customization layer"
        );
        environment = environment.customize(&customization)?;
        source_files.extend(layer.source_files());
    }

    tracing::info!(
        environment = %environment.qualified_name(),
        layers = 1 + customizations.len(),
        "composed environment"
    );
    Ok(ComposedEnvironment {
        environment,
        source_files,
    })
}

/// Compose in-memory descriptors: the first is the base, the others are
/// customization layers. Imports are not followed.
pub fn compose_descriptors(descriptors: &[EnvDescriptor]) -> crate::Result<ComposedEnvironment> {
    let mut layers = descriptors.iter().cloned().map(Layer::new);
    let base = layers.next().unwrap_or_default();
    let customizations: Vec<Layer> = layers.collect();
    compose_layers(&base, &customizations)
}
