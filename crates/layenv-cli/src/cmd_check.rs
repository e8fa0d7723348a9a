// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Validate the composed environment.

use clap::Args;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

/// Validate the composed environment and list diagnostics
#[derive(Debug, Args)]
pub struct CmdCheck {
    #[clap(flatten)]
    layers: crate::LayerFlags,

    /// Print diagnostics as JSON
    #[clap(long)]
    json: bool,

    /// Treat warnings as errors
    #[clap(long)]
    strict: bool,
}

impl CmdCheck {
    pub fn run(&mut self) -> Result<i32> {
        let (_, composed) = self.layers.compose()?;
        let report = composed.validate();

        if self.json {
            // stdout only carries the JSON, so the log is where humans see it
            report.log();
            println!("{}", report.to_json().into_diagnostic()?);
        } else {
            print!("{}", render_report(&composed.environment, &report));
        }

        let failed = report.has_errors() || (self.strict && report.has_warnings());
        Ok(if failed { 1 } else { 0 })
    }
}

/// Human readable listing of the report, one line per diagnostic.
fn render_report(env: &layenv::Environment, report: &layenv::ValidationErrors) -> String {
    if report.is_empty() {
        return format!("{} {} is valid\n", "✓".green(), env.qualified_name());
    }

    let mut out = String::new();
    for diagnostic in report {
        let severity = match diagnostic.severity {
            layenv::Severity::Warning => "warning".yellow(),
            layenv::Severity::Error => "error".red(),
        };
        out.push_str(&format!(
            "{severity}: {} {}\n",
            diagnostic.message,
            format!("@{}", diagnostic.location).dimmed()
        ));
    }
    out.push_str(&format!(
        "\n{} error(s), {} warning(s)\n",
        report.error_count(),
        report.warning_count()
    ));
    out
}

#[cfg(test)]
#[path = "./cmd_check_test.rs"]
mod cmd_check_test;
