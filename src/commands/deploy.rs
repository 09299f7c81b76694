//! Deploy command handler
//!
//! Drives the pipeline stage by stage with progress output, aborting on the
//! first failed stage after a best-effort cleanup of local artifacts.

use anyhow::Result;
use chrono::Local;

use moonium_deploy::pipeline::{Pipeline, ARCHIVE_FILE};
use moonium_deploy::process::SystemRunner;
use moonium_deploy::report::deploy_message;
use moonium_deploy::Environment;

/// Execute the deploy command
pub fn cmd_deploy(environment: Environment) -> Result<()> {
    let config = environment.config();
    let pipeline = Pipeline::new(&config, ".");
    let mut runner = SystemRunner;

    println!("🚀 Moonium Deploy");
    println!("Environment: {}", config.display_name);
    println!("Target: /opt/{}", config.remote_path);
    println!();
    println!("Starting deployment process");

    if let Err(err) = run_stages(&pipeline, &mut runner, config.build_mode, config.host) {
        // leave no half-built artifacts behind on a failed run
        let _ = pipeline.clean();
        return Err(err.into());
    }

    println!("Deploy completed successfully!");
    println!();
    println!("{}", deploy_message(&config, Local::now().date_naive()));

    Ok(())
}

fn run_stages(
    pipeline: &Pipeline<'_>,
    runner: &mut SystemRunner,
    build_mode: &str,
    host: &str,
) -> moonium_deploy::DeployResult<()> {
    pipeline.clean()?;

    println!("▶ Building client (NODE_ENV={build_mode})");
    pipeline.build(runner)?;

    println!("▶ Packing build output into {ARCHIVE_FILE}");
    pipeline.archive(runner)?;

    println!("▶ Uploading archive to {host}");
    pipeline.upload(runner)?;

    println!("▶ Unpacking archive on the server");
    pipeline.remote_unpack(runner)?;

    pipeline.clean()?;
    Ok(())
}
