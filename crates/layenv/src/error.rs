// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for layenv operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// Convenience Result type with layenv Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort loading or composition.
///
/// Problems found while validating a composed environment are not reported
/// here, they are accumulated in [`crate::ValidationErrors`] instead.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Descriptor not found at specified path
    #[error("Environment descriptor not found at {0:?}")]
    #[diagnostic(
        code(layenv::not_found_at_path),
        help("Point -f at a descriptor file or a directory containing environment.yaml")
    )]
    NotFoundAtPath(PathBuf),

    /// Invalid YAML in descriptor file
    #[error("Invalid environment descriptor: {error}")]
    #[diagnostic(
        code(layenv::invalid_yaml),
        help("Check the YAML syntax of the descriptor")
    )]
    InvalidYaml {
        #[source]
        error: serde_yaml::Error,
        yaml_content: String,
    },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(layenv::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Imported descriptor not found
    #[error("Imported descriptor not found: {path:?}")]
    #[diagnostic(
        code(layenv::import_not_found),
        help("Check that the import path is correct and the file exists")
    )]
    ImportNotFound {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Circular import detected
    #[error("Circular import detected: {0:?}")]
    #[diagnostic(
        code(layenv::circular_import),
        help("Remove the circular reference in your imports")
    )]
    CircularImport(PathBuf),

    /// Two entities with different identities were folded together
    #[error("Unrelated {kind}s cannot be composed: '{left}' and '{right}'")]
    #[diagnostic(
        code(layenv::unrelated_entities),
        help("merge and customize only combine entities sharing the same name")
    )]
    UnrelatedEntities {
        kind: &'static str,
        left: String,
        right: String,
    },

    /// A mandatory reference could not be resolved
    #[error("Unresolved reference: {0}")]
    #[diagnostic(code(layenv::unresolved_reference))]
    UnresolvedReference(#[from] ValidationError),

    /// The composed environment has validation errors
    #[error("Validation failed with {errors} error(s) and {warnings} warning(s)")]
    #[diagnostic(
        code(layenv::validation_failed),
        help("Run 'layenv check' to list every diagnostic")
    )]
    ValidationFailed { errors: usize, warnings: usize },

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(layenv::io_error))]
    Io(#[from] std::io::Error),
}
