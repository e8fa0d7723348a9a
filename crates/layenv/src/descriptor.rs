// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Descriptor file parsing and the typed tree of one layer.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "./descriptor_test.rs"]
mod descriptor_test;

/// Free-form parameter block; null values are dropped when composed.
pub type ParamsBlock = IndexMap<String, serde_yaml::Value>;

/// String block (env, proxy, auth); `~` values are dropped when composed.
pub type StringBlock = IndexMap<String, Option<String>>;

/// API version for descriptor files.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "layenv/v0")]
    V0,
}

/// Helper for two-stage deserialization to determine API version first.
#[derive(Deserialize)]
struct ApiVersionMapping {
    #[serde(default)]
    api: ApiVersion,
}

/// One layer of an environment, as written by its author.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EnvDescriptor {
    /// API version identifier.
    #[serde(default)]
    pub api: ApiVersion,

    /// Environment name; may be empty for reusable fragments.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Optional qualifier, e.g. the stage (`dev`, `prod`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Descriptors merged into this one at a lower priority.
    /// Relative paths are resolved relative to this file's directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,

    #[serde(default)]
    pub platform: PlatformDescriptor,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub providers: IndexMap<String, ProviderDescriptor>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub nodes: IndexMap<String, NodeSetDescriptor>,

    /// Path to the file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

/// The `platform:` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlatformDescriptor {
    /// Base url that relative component repositories are resolved against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Authentication inherited by every component repository.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub auth: StringBlock,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<DistributionDescriptor>,

    /// Id of the component deploying stacks onto the nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchestrator: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub components: IndexMap<String, ComponentDescriptor>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ComponentDescriptor {
    /// Absolute url, or a path relative to the platform base.
    #[serde(default)]
    pub repository: String,

    /// Branch, tag or commit to use.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub auth: StringBlock,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DistributionDescriptor {
    /// Id of the component supplying the distribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: ParamsBlock,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: StringBlock,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderDescriptor {
    /// Id of the component implementing the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: ParamsBlock,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: StringBlock,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub proxy: StringBlock,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NodeSetDescriptor {
    #[serde(default)]
    pub instances: u32,

    #[serde(default)]
    pub provider: ProviderRefDescriptor,
}

/// A use of a provider, with overrides on top of the provider's own blocks.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderRefDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: ParamsBlock,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: StringBlock,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub proxy: StringBlock,
}

impl EnvDescriptor {
    /// Parse descriptor from YAML string.
    pub fn from_yaml<S: Into<String>>(yaml: S) -> crate::Result<Self> {
        let yaml = yaml.into();

        // Stage 1: Parse to get API version
        let value: serde_yaml::Value =
            serde_yaml::from_str(&yaml).map_err(|e| crate::Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        let with_version: ApiVersionMapping =
            serde_yaml::from_value(value.clone()).map_err(|e| crate::Error::InvalidYaml {
                error: e,
                yaml_content: yaml.clone(),
            })?;

        // Stage 2: Deserialize based on version
        match with_version.api {
            ApiVersion::V0 => {
                serde_yaml::from_value(value).map_err(|e| crate::Error::InvalidYaml {
                    error: e,
                    yaml_content: yaml,
                })
            }
        }
    }

    /// Load descriptor from file path.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| crate::Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut descriptor = Self::from_yaml(yaml)?;
        descriptor.source_path = Some(path.to_path_buf());
        Ok(descriptor)
    }

    /// Resolve the imports of this descriptor to canonical paths.
    pub fn resolve_imports(&self) -> crate::Result<Vec<PathBuf>> {
        let base_dir = self.source_path.as_ref().and_then(|p| p.parent());
        self.imports
            .iter()
            .map(|import| resolve_import_path(import, base_dir))
            .collect()
    }
}

/// Resolve an import path to an absolute canonical path.
pub(crate) fn resolve_import_path(import: &str, base_dir: Option<&Path>) -> crate::Result<PathBuf> {
    let path = if import.starts_with('~') {
        // Home-relative
        let home = dirs::home_dir().ok_or_else(|| crate::Error::ImportNotFound {
            path: PathBuf::from(import),
            error: std::io::Error::new(std::io::ErrorKind::NotFound, "HOME is not set"),
        })?;
        let rel = import.strip_prefix("~/").unwrap_or(import);
        home.join(rel)
    } else if Path::new(import).is_absolute() {
        PathBuf::from(import)
    } else {
        match base_dir {
            Some(base) => base.join(import),
            None => PathBuf::from(import),
        }
    };

    dunce::canonicalize(&path).map_err(|e| crate::Error::ImportNotFound {
        path: path.clone(),
        error: e,
    })
}
