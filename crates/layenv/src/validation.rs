// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Accumulation of validation diagnostics.
//!
//! Validation never stops at the first problem: every entity folds its own
//! findings and those of its children into one [`ValidationErrors`] report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::DescriptorLocation;
use crate::Environment;

#[cfg(test)]
#[path = "./validation_test.rs"]
mod validation_test;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Severity {
    /// Advisory, the environment remains usable.
    Warning,
    /// The environment must not be used for provisioning.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("Warning"),
            Self::Error => f.write_str("Error"),
        }
    }
}

/// A single diagnostic tied to a place in the descriptor.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[error("{message} @{location}")]
pub struct ValidationError {
    pub severity: Severity,
    pub message: String,
    pub location: String,
}

impl ValidationError {
    pub fn error<M: Into<String>>(message: M, location: &DescriptorLocation) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location: location.to_string(),
        }
    }

    pub fn warning<M: Into<String>>(message: M, location: &DescriptorLocation) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            location: location.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Ordered, append-only list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error<M: Into<String>>(&mut self, message: M, location: &DescriptorLocation) {
        self.errors.push(ValidationError::error(message, location));
    }

    pub fn add_warning<M: Into<String>>(&mut self, message: M, location: &DescriptorLocation) {
        self.errors.push(ValidationError::warning(message, location));
    }

    /// Append an already built diagnostic.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every diagnostic of `other`, keeping its order.
    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// True if at least one diagnostic has error severity.
    ///
    /// This is the only signal deciding whether a composed environment may
    /// be used downstream.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ValidationError::is_error)
    }

    /// True if at least one diagnostic has warning severity.
    pub fn has_warnings(&self) -> bool {
        self.errors.iter().any(|e| e.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors.iter().filter(|e| e.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.errors.len() - self.error_count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Serialize the report as a pretty-printed JSON list of records.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.errors)
    }

    /// Emit every diagnostic through tracing.
    pub fn log(&self) {
        for e in &self.errors {
            match e.severity {
                Severity::Warning => {
                    tracing::warn!(location = %e.location, "{}", e.message)
                }
                Severity::Error => {
                    tracing::error!(location = %e.location, "{}", e.message)
                }
            }
        }
    }

    /// Turn a report containing errors into a hard failure.
    ///
    /// Warnings alone never fail; the report is handed back untouched.
    pub fn into_result(self) -> crate::Result<Self> {
        if self.has_errors() {
            return Err(crate::Error::ValidationFailed {
                errors: self.error_count(),
                warnings: self.warning_count(),
            });
        }
        Ok(self)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(value: ValidationError) -> Self {
        Self {
            errors: vec![value],
        }
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Structural checks run against a fully composed environment.
///
/// `env` is where references are looked up; entities never hold a pointer
/// back to the environment that owns them.
pub trait Validate {
    fn validate(&self, env: &Environment) -> ValidationErrors;
}
