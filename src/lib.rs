//! Moonium deploy - build, package and ship the Moonium web client
//!
//! The Moonium client is a static site. Shipping it means exporting the
//! build, zipping it, copying the archive to the server over scp and
//! unpacking it into the environment's serving directory over ssh. This
//! crate wraps that sequence in a single checked pipeline.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod report;

// Re-exports for convenience
pub use config::{Environment, EnvironmentConfig};
pub use error::{DeployError, DeployResult};
pub use pipeline::{remote_command, Pipeline, Stage};
pub use process::{CommandSpec, ProcessRunner, SystemRunner};
pub use report::deploy_message;
