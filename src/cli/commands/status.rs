//! Status command - show environment detection and installer state

use crate::cli::args::{OutputFormat, StatusArgs};
use crate::config::{Config, ConfigManager};
use crate::environment::SystemProbe;
use crate::error::RequisiteResult;
use crate::requirements::{InstallEnvironment, InstallOptions, ProgressMarker};
use crate::ui::{self, Level, UiContext};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct StatusReport {
    config_file: PathBuf,
    config_dir: PathBuf,
    skip: bool,
    environment: InstallEnvironment,
    options: InstallOptions,
    progress_file: PathBuf,
    install_in_progress: bool,
    install_started: Option<DateTime<Local>>,
}

/// Execute the status command
pub async fn execute(
    args: StatusArgs,
    config: &Config,
    manager: &ConfigManager,
) -> RequisiteResult<()> {
    let probe = SystemProbe::new(config.installer.wheels_env.clone());
    let environment =
        InstallEnvironment::detect(&probe, config.constraints_path().as_deref()).await;
    let options = InstallOptions::derive(&environment, &config.deps_path())
        .with_upgrade(config.installer.upgrade);

    let progress_file = config.progress_path();
    let install_in_progress = ProgressMarker::is_present(&progress_file);
    let install_started = if install_in_progress {
        marker_modified(&progress_file).await
    } else {
        None
    };

    let report = StatusReport {
        config_file: manager.path().to_path_buf(),
        config_dir: config.config_dir(),
        skip: config.installer.skip,
        environment,
        options,
        progress_file,
        install_in_progress,
        install_started,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table | OutputFormat::Plain => print_report(&report),
    }

    Ok(())
}

async fn marker_modified(path: &Path) -> Option<DateTime<Local>> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    metadata.modified().ok().map(DateTime::<Local>::from)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn print_report(report: &StatusReport) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "requisite status");

    ui::section(&ctx, "Configuration");
    ui::field(&ctx, "Config file", &report.config_file.display().to_string());
    ui::field(&ctx, "Config dir", &report.config_dir.display().to_string());
    ui::field_status(&ctx, "Installs enabled", yes_no(!report.skip), !report.skip);

    let env = &report.environment;
    ui::section(&ctx, "Environment");
    ui::field(&ctx, "Virtual env", yes_no(env.virtual_env));
    ui::field(&ctx, "Container", yes_no(env.container_env));
    ui::field(
        &ctx,
        "Wheels links",
        env.wheels_link.as_deref().unwrap_or("-"),
    );
    match env.constraints {
        Some(ref path) => ui::field(&ctx, "Constraints", &path.display().to_string()),
        None => ui::field(&ctx, "Constraints", "-"),
    }

    let options = &report.options;
    ui::section(&ctx, "Install options");
    match options.target {
        Some(ref target) => ui::field(&ctx, "Target", &target.display().to_string()),
        None => ui::field(&ctx, "Target", "environment default"),
    }
    ui::field(&ctx, "Upgrade", yes_no(options.upgrade));
    ui::field(&ctx, "No cache dir", yes_no(options.no_cache_dir));

    ui::section(&ctx, "Installer");
    match report.install_started {
        Some(started) => ui::step_detail(
            &ctx,
            Level::Warn,
            "Install in progress",
            &format!("started {}", started.format("%Y-%m-%d %H:%M:%S")),
        ),
        None if report.install_in_progress => {
            ui::step_detail(&ctx, Level::Warn, "Install in progress", "start time unknown")
        }
        None => ui::step(&ctx, Level::Ok, "Idle"),
    }
    ui::field(&ctx, "Progress file", &report.progress_file.display().to_string());
}
