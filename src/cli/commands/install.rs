//! Install command - ensure a component's requirements are present

use crate::cli::args::InstallArgs;
use crate::config::Config;
use crate::error::RequisiteResult;
use crate::requirements::{create_coordinator, Requirement};
use crate::ui::{self, InstallProgress, Level, UiContext};
use tracing::debug;

/// Execute the install command
pub async fn execute(args: InstallArgs, config: &Config) -> RequisiteResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let requirements = args
        .requirements
        .iter()
        .map(Requirement::new)
        .collect::<RequisiteResult<Vec<_>>>()?;

    ui::intro(&ctx, &format!("Requirements for {}", args.component));

    if config.installer.skip {
        ui::step_detail(
            &ctx,
            Level::Warn,
            "Requirement installation is disabled",
            "installer.skip is set in the configuration",
        );
        ui::outro(&ctx, true, "Nothing installed");
        return Ok(());
    }

    let prompt = format!(
        "Install missing requirements for {} ({} specifier(s))?",
        args.component,
        requirements.len()
    );
    if !ui::confirm(&ctx, &prompt, true).await? {
        ui::outro(&ctx, false, "Cancelled");
        return Ok(());
    }

    let coordinator = create_coordinator(config);
    debug!("Install options: {:?}", coordinator.install_options().await);

    let progress = InstallProgress::new(&ctx, &args.component, requirements.len());
    let result = coordinator
        .ensure_requirements_with_progress(&args.component, &requirements, &|req, state| {
            progress.on_state(req, state)
        })
        .await;
    progress.finish();

    match result {
        Ok(()) => {
            ui::outro(&ctx, true, &format!("{} is ready", args.component));
            Ok(())
        }
        Err(e) => {
            if e.is_retryable() {
                ui::step_detail(
                    &ctx,
                    Level::Warn,
                    "Failed requirements are not remembered",
                    "running the command again retries them",
                );
            }
            ui::outro(&ctx, false, &format!("Could not set up {}", args.component));
            Err(e)
        }
    }
}
