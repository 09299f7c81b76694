//! Deploy environments and their fixed configuration records.
//!
//! There are exactly two deploy targets. Both live on the same host; they
//! differ in serving path and in the `NODE_ENV` value handed to the build.

use std::fmt;

/// Server hosting both environments.
const DEPLOY_HOST: &str = "51.158.42.69";

/// Deploy target environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Environment {
    /// Pre-production environment for QA
    Staging,
    /// Live environment
    Production,
}

impl Environment {
    /// Resolve the fixed configuration record for this environment.
    ///
    /// Pure lookup; the argument validator upstream guarantees the key is
    /// one of the two known environments, so there is no error path here.
    pub fn config(self) -> EnvironmentConfig {
        match self {
            Environment::Staging => EnvironmentConfig {
                environment: self,
                build_mode: "test",
                display_name: "Staging",
                host: DEPLOY_HOST,
                remote_path: "Staging/Moonium",
            },
            Environment::Production => EnvironmentConfig {
                environment: self,
                build_mode: "production",
                display_name: "Production",
                host: DEPLOY_HOST,
                remote_path: "Production/Moonium",
            },
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Everything the pipeline needs to know about a deploy target.
///
/// Resolved once at startup from the CLI argument and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub environment: Environment,
    /// `NODE_ENV` value passed to the build invocation
    pub build_mode: &'static str,
    /// Human-readable name used in output
    pub display_name: &'static str,
    /// Server address for scp/ssh
    pub host: &'static str,
    /// Serving directory under `/opt/` on the server
    pub remote_path: &'static str,
}
