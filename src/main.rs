//! Moonium deploy CLI
//!
//! Usage: moonium-deploy <ENVIRONMENT>
//!
//! Environments:
//!   staging     Pre-production target under /opt/Staging/Moonium
//!   production  Live target under /opt/Production/Moonium

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::deploy::cmd_deploy(cli.environment)
}
