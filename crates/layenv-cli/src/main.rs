// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! layenv - Layered Environment Descriptor Composition CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

mod cmd_check;
mod cmd_show;

use cmd_check::CmdCheck;
use cmd_show::CmdShow;

#[derive(Parser)]
#[clap(
    name = "layenv",
    about = "Layered Environment Descriptor Composition",
    version,
    long_about = "Compose environment descriptors, their imports and customization layers"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

/// Which layers make up the environment.
#[derive(Parser, Clone, Debug, Default)]
pub struct LayerFlags {
    /// Base descriptor, or a directory containing environment.yaml
    #[clap(short, long, default_value = ".")]
    pub file: PathBuf,

    /// Customization layer applied on top of the base (repeatable)
    #[clap(
        short = 'c',
        long = "customize",
        env = "LAYENV_CUSTOMIZE",
        value_delimiter = ':'
    )]
    pub customize: Vec<PathBuf>,

    /// Ignore the imports declared by descriptors
    #[clap(long = "no-imports", env = "LAYENV_NO_IMPORTS")]
    pub no_imports: bool,
}

impl LayerFlags {
    pub fn load_options(&self) -> layenv::LoadOptions {
        layenv::LoadOptions {
            customizations: self.customize.clone(),
            no_imports: self.no_imports,
        }
    }

    /// Load every layer and compose them.
    pub fn compose(&self) -> Result<(layenv::LoadedLayers, layenv::ComposedEnvironment)> {
        let loaded = layenv::load_layers(&self.file, &self.load_options())?;
        let composed = loaded.compose()?;
        Ok((loaded, composed))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Display the composed environment
    Show(CmdShow),

    /// Validate the composed environment and list diagnostics
    Check(CmdCheck),
}

impl Opt {
    fn run(self) -> Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        // Dispatch to command
        match self.cmd {
            Command::Show(mut cmd) => cmd.run(),
            Command::Check(mut cmd) => cmd.run(),
        }
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}
