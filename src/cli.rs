use clap::Parser;

use moonium_deploy::Environment;

/// Build, package and ship the Moonium web client to a deploy target.
#[derive(Parser, Debug)]
#[command(name = "moonium-deploy")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Builds with yarn, ships the archive over scp and unpacks it over ssh.")]
pub struct Cli {
    /// Environment to deploy to
    #[arg(value_enum)]
    pub environment: Environment,
}
