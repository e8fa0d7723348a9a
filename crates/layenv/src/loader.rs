// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Loading descriptor files and their imports from disk.

use std::path::{Path, PathBuf};

#[cfg(test)]
#[path = "./loader_test.rs"]
mod loader_test;

use crate::compose::Layer;
use crate::descriptor::resolve_import_path;
use crate::{EnvDescriptor, DESCRIPTOR_FILENAME};

/// Options for loading behavior.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Customization layers applied on top of the base descriptor
    /// (from --customize or LAYENV_CUSTOMIZE).
    pub customizations: Vec<PathBuf>,

    /// Ignore `imports:` (from --no-imports or LAYENV_NO_IMPORTS).
    pub no_imports: bool,
}

/// The layers making up one environment.
#[derive(Debug, Clone)]
pub struct LoadedLayers {
    pub base: Layer,
    pub customizations: Vec<Layer>,
}

impl LoadedLayers {
    /// Every source file, in folding order.
    pub fn source_files(&self) -> Vec<PathBuf> {
        let mut files = self.base.source_files();
        for layer in &self.customizations {
            files.extend(layer.source_files());
        }
        files
    }

    pub fn compose(&self) -> crate::Result<crate::ComposedEnvironment> {
        crate::compose_layers(&self.base, &self.customizations)
    }
}

/// Load the base descriptor at `path` and the configured customizations.
///
/// A directory resolves to the [`DESCRIPTOR_FILENAME`] it contains.
pub fn load_layers<P: AsRef<Path>>(path: P, options: &LoadOptions) -> crate::Result<LoadedLayers> {
    let mut loader = Loader::new(options);
    let base = loader.load(path.as_ref())?;
    let customizations = options
        .customizations
        .iter()
        .map(|p| loader.load(p))
        .collect::<crate::Result<Vec<_>>>()?;
    Ok(LoadedLayers {
        base,
        customizations,
    })
}

/// Loads one layer tree at a time.
///
/// Only the chain of imports currently being loaded is tracked, so the same
/// fragment may be imported from two different places.
struct Loader {
    no_imports: bool,
    stack: Vec<PathBuf>,
}

impl Loader {
    fn new(options: &LoadOptions) -> Self {
        Self {
            no_imports: options.no_imports,
            stack: Vec::new(),
        }
    }

    fn load(&mut self, path: &Path) -> crate::Result<Layer> {
        let path = resolve_descriptor_path(path)?;
        let descriptor = EnvDescriptor::load(&path)?;
        tracing::debug!(path = %path.display(), "loaded descriptor");
        if self.no_imports || descriptor.imports.is_empty() {
            return Ok(Layer::new(descriptor));
        }

        self.stack.push(path);
        let imports = self.load_imports(&descriptor);
        self.stack.pop();
        Ok(Layer::with_imports(descriptor, imports?))
    }

    fn load_imports(&mut self, descriptor: &EnvDescriptor) -> crate::Result<Vec<Layer>> {
        let base_dir = descriptor.source_path.as_ref().and_then(|p| p.parent());
        let mut imports = Vec::with_capacity(descriptor.imports.len());
        for import in &descriptor.imports {
            let import_path = resolve_import_path(import, base_dir)?;
            if self.stack.contains(&import_path) {
                return Err(crate::Error::CircularImport(import_path));
            }
            imports.push(self.load(&import_path)?);
        }
        Ok(imports)
    }
}

/// Resolve a file or directory argument to a canonical descriptor path.
fn resolve_descriptor_path(path: &Path) -> crate::Result<PathBuf> {
    let path = if path.is_dir() {
        path.join(DESCRIPTOR_FILENAME)
    } else {
        path.to_path_buf()
    };
    if !path.is_file() {
        return Err(crate::Error::NotFoundAtPath(path));
    }
    Ok(dunce::canonicalize(&path)?)
}
