//! Component command - set up a component from its manifest

use crate::cli::args::ComponentArgs;
use crate::component::ComponentLoader;
use crate::config::Config;
use crate::error::RequisiteResult;
use crate::requirements::create_coordinator;
use crate::ui::{self, InstallProgress, Level, UiContext};
use std::sync::Arc;

/// Execute the component command
pub async fn execute(args: ComponentArgs, config: &Config) -> RequisiteResult<()> {
    let ctx = UiContext::detect();
    let dir = args.dir.unwrap_or_else(|| config.components_dir());

    let coordinator = Arc::new(create_coordinator(config));
    let loader =
        ComponentLoader::new(dir, coordinator).with_skip_requirements(config.installer.skip);

    let order = loader.resolve(&args.domain).await?;
    ui::intro(&ctx, &format!("Setting up {}", args.domain));
    ui::field(&ctx, "Manifests", &loader.dir().display().to_string());

    if order.len() > 1 {
        let dependencies: Vec<&str> = order[..order.len() - 1]
            .iter()
            .map(|m| m.domain())
            .collect();
        ui::field(&ctx, "Dependencies", &dependencies.join(", "));
    }

    if config.installer.skip {
        ui::step_detail(
            &ctx,
            Level::Warn,
            "Requirement installation is disabled",
            "installer.skip is set in the configuration",
        );
    }

    let total = order
        .iter()
        .map(|m| m.component.requirements.len())
        .sum::<usize>();
    if total == 0 {
        ui::step(&ctx, Level::Info, "No requirements to install");
    }
    let progress = (!config.installer.skip && total > 0)
        .then(|| InstallProgress::new(&ctx, &args.domain, total));

    let result = loader
        .ensure_with_progress(&args.domain, &|req, state| {
            if let Some(ref progress) = progress {
                progress.on_state(req, state);
            }
        })
        .await;

    if let Some(ref progress) = progress {
        progress.finish();
    }

    match result {
        Ok(manifest) => {
            ui::outro(&ctx, true, &format!("{} is ready", manifest.display_name()));
            Ok(())
        }
        Err(e) => {
            ui::outro(&ctx, false, &format!("Could not set up {}", args.domain));
            Err(e)
        }
    }
}
