//! The deploy pipeline: clean, build, archive, upload, unpack.
//!
//! Five strictly sequential steps, each one an external tool invocation
//! checked through [`ProcessRunner`]. The pipeline aborts on the first
//! failure; there is no retry and no rollback, matching the scope of a
//! single-host deploy helper.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::config::EnvironmentConfig;
use crate::error::DeployResult;
use crate::process::{CommandSpec, ProcessRunner};

/// Local directory the static export writes to
pub const BUILD_DIR: &str = "out";
/// Local archive shipped to the server
pub const ARCHIVE_FILE: &str = "out.zip";
/// Remote account owning the deploy targets
pub const REMOTE_USER: &str = "regsm";
/// Remote directory the archive lands in before unpacking
pub const REMOTE_STAGING_DIR: &str = "/opt/";

/// Pipeline step, used to tag failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Archive,
    Upload,
    RemoteUnpack,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Build => write!(f, "build"),
            Stage::Archive => write!(f, "archive"),
            Stage::Upload => write!(f, "upload"),
            Stage::RemoteUnpack => write!(f, "remote unpack"),
        }
    }
}

/// Compose the command executed on the server after the upload.
///
/// Relative paths are resolved from the serving directory, two levels below
/// `/opt/` where scp dropped the archive: enter the directory, wipe its
/// current contents, unpack the new build in place, drop the archive.
pub fn remote_command(remote_path: &str) -> String {
    [
        format!("cd /opt/{remote_path}"),
        "rm -rf ./*".to_string(),
        "unzip -q ../../out.zip -d .".to_string(),
        "rm -rf ../../out.zip".to_string(),
    ]
    .join("; ")
}

/// One deploy run against a resolved environment.
pub struct Pipeline<'a> {
    config: &'a EnvironmentConfig,
    workdir: PathBuf,
}

impl<'a> Pipeline<'a> {
    /// Pipeline rooted at `workdir`, the project directory holding the
    /// build tooling and receiving `out/` and `out.zip`.
    pub fn new(config: &'a EnvironmentConfig, workdir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            workdir: workdir.into(),
        }
    }

    /// Remove local build artifacts (`out/` and `out.zip`).
    ///
    /// Runs both before the build, so stale output cannot leak into the
    /// archive, and after the transfer. Idempotent: missing artifacts are
    /// not an error.
    pub fn clean(&self) -> DeployResult<()> {
        remove_ignore_missing(fs::remove_dir_all(self.workdir.join(BUILD_DIR)))?;
        remove_ignore_missing(fs::remove_file(self.workdir.join(ARCHIVE_FILE)))?;
        Ok(())
    }

    /// Export a fresh static build with the environment's build mode.
    ///
    /// `NODE_ENV` is scoped to the child invocation rather than set on the
    /// deploy process itself.
    pub fn build(&self, runner: &mut dyn ProcessRunner) -> DeployResult<()> {
        let spec = CommandSpec::new("yarn")
            .arg("export")
            .env("NODE_ENV", self.config.build_mode)
            .current_dir(&self.workdir);
        runner.run(Stage::Build, &spec)
    }

    /// Zip the build output into the archive, rooted inside `out/` so the
    /// archive holds the site's files at its top level.
    pub fn archive(&self, runner: &mut dyn ProcessRunner) -> DeployResult<()> {
        let spec = CommandSpec::new("zip")
            .arg("-r")
            .arg(format!("../{ARCHIVE_FILE}"))
            .arg(".")
            .current_dir(self.workdir.join(BUILD_DIR));
        runner.run(Stage::Archive, &spec)
    }

    /// Copy the archive to the server's staging directory.
    pub fn upload(&self, runner: &mut dyn ProcessRunner) -> DeployResult<()> {
        let spec = CommandSpec::new("scp")
            .arg(ARCHIVE_FILE)
            .arg(format!(
                "{REMOTE_USER}@{}:{REMOTE_STAGING_DIR}",
                self.config.host
            ))
            .current_dir(&self.workdir);
        runner.run(Stage::Upload, &spec)
    }

    /// Unpack the uploaded archive into the serving directory, replacing
    /// its previous contents.
    pub fn remote_unpack(&self, runner: &mut dyn ProcessRunner) -> DeployResult<()> {
        let spec = CommandSpec::new("ssh")
            .arg(format!("{REMOTE_USER}@{}", self.config.host))
            .arg(remote_command(self.config.remote_path));
        runner.run(Stage::RemoteUnpack, &spec)
    }

    /// Run the whole pipeline in order, including the leading and trailing
    /// artifact cleanup. Stops at the first failing stage.
    pub fn run(&self, runner: &mut dyn ProcessRunner) -> DeployResult<()> {
        self.clean()?;
        self.build(runner)?;
        self.archive(runner)?;
        self.upload(runner)?;
        self.remote_unpack(runner)?;
        self.clean()?;
        Ok(())
    }
}

fn remove_ignore_missing(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::error::DeployError;
    use std::fs;

    /// Records invocations instead of running them, optionally failing at
    /// a chosen stage.
    struct RecordingRunner {
        calls: Vec<(Stage, CommandSpec)>,
        fail_at: Option<Stage>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                fail_at: None,
            }
        }

        fn failing_at(stage: Stage) -> Self {
            Self {
                calls: Vec::new(),
                fail_at: Some(stage),
            }
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&mut self, stage: Stage, spec: &CommandSpec) -> DeployResult<()> {
            self.calls.push((stage, spec.clone()));
            if self.fail_at == Some(stage) {
                return Err(DeployError::StageFailed { stage, code: 1 });
            }
            Ok(())
        }
    }

    #[test]
    fn remote_command_exact_shape() {
        assert_eq!(
            remote_command("Staging/Moonium"),
            "cd /opt/Staging/Moonium; rm -rf ./*; unzip -q ../../out.zip -d .; rm -rf ../../out.zip"
        );
    }

    #[test]
    fn staging_run_invokes_tools_in_order() {
        let config = Environment::Staging.config();
        let workdir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(&config, workdir.path());
        let mut runner = RecordingRunner::new();

        pipeline.run(&mut runner).unwrap();

        let stages: Vec<Stage> = runner.calls.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            stages,
            vec![Stage::Build, Stage::Archive, Stage::Upload, Stage::RemoteUnpack]
        );

        let (_, build) = &runner.calls[0];
        assert_eq!(build.program, "yarn");
        assert_eq!(build.args, vec!["export"]);
        assert_eq!(build.envs, vec![("NODE_ENV".to_string(), "test".to_string())]);

        let (_, archive) = &runner.calls[1];
        assert_eq!(archive.program, "zip");
        assert_eq!(archive.args, vec!["-r", "../out.zip", "."]);
        assert_eq!(archive.cwd, Some(workdir.path().join("out")));

        let (_, upload) = &runner.calls[2];
        assert_eq!(upload.program, "scp");
        assert_eq!(upload.args, vec!["out.zip", "regsm@51.158.42.69:/opt/"]);

        let (_, unpack) = &runner.calls[3];
        assert_eq!(unpack.program, "ssh");
        assert_eq!(
            unpack.args,
            vec![
                "regsm@51.158.42.69".to_string(),
                remote_command("Staging/Moonium")
            ]
        );
    }

    #[test]
    fn production_run_targets_production_path() {
        let config = Environment::Production.config();
        let workdir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(&config, workdir.path());
        let mut runner = RecordingRunner::new();

        pipeline.run(&mut runner).unwrap();

        let (_, build) = &runner.calls[0];
        assert_eq!(
            build.envs,
            vec![("NODE_ENV".to_string(), "production".to_string())]
        );
        let (_, unpack) = &runner.calls[3];
        assert!(unpack.args[1].contains("Production/Moonium"));
    }

    #[test]
    fn failure_stops_pipeline_at_failed_stage() {
        let config = Environment::Staging.config();
        let workdir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(&config, workdir.path());
        let mut runner = RecordingRunner::failing_at(Stage::Archive);

        let err = pipeline.run(&mut runner).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Archive));

        // upload and remote unpack never ran
        let stages: Vec<Stage> = runner.calls.iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, vec![Stage::Build, Stage::Archive]);
    }

    #[test]
    fn clean_removes_stale_artifacts() {
        let config = Environment::Staging.config();
        let workdir = tempfile::tempdir().unwrap();
        fs::create_dir(workdir.path().join("out")).unwrap();
        fs::write(workdir.path().join("out/index.html"), "<html>").unwrap();
        fs::write(workdir.path().join("out.zip"), b"stale").unwrap();

        let pipeline = Pipeline::new(&config, workdir.path());
        pipeline.clean().unwrap();

        assert!(!workdir.path().join("out").exists());
        assert!(!workdir.path().join("out.zip").exists());
    }

    #[test]
    fn clean_is_idempotent_when_nothing_exists() {
        let config = Environment::Staging.config();
        let workdir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(&config, workdir.path());

        pipeline.clean().unwrap();
        pipeline.clean().unwrap();
    }
}
