//! Progress indicators with CI fallback

use super::context::UiContext;
use crate::requirements::{Requirement, RequirementState};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A task spinner with CI fallback
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    /// Create a new spinner
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    /// Start the spinner with a message
    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            println!("{} {}", style("...").dim(), message);
        }
    }

    /// Stop with success message
    pub fn stop(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        } else {
            println!("{} {}", style("[OK]").green(), message);
        }
    }

    /// Stop with error message
    pub fn stop_error(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(message);
        } else {
            println!("{} {}", style("[FAIL]").red(), message);
        }
    }
}

/// Progress bar across the requirements of one install run.
///
/// Advances once per specifier that reaches a final state. Plain lines are
/// printed in CI instead of a bar.
pub struct InstallProgress {
    bar: Option<ProgressBar>,
}

impl InstallProgress {
    /// Create a progress indicator for `total` requirements of `label`
    pub fn new(ctx: &UiContext, label: &str, total: usize) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(total as u64);
            let template = "  {spinner:.cyan} {prefix}  {bar:20.cyan/dim} {pos}/{len} {msg:.dim}  {elapsed:.dim}";
            if let Ok(progress_style) = ProgressStyle::default_bar().template(template) {
                bar.set_style(
                    progress_style
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                        .progress_chars("━╸─"),
                );
            }
            bar.set_prefix(label.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            println!("Processing {} requirement(s) for {}...", total, label);
            None
        };
        Self { bar }
    }

    /// Record a state transition reported by the coordinator
    pub fn on_state(&self, requirement: &Requirement, state: RequirementState) {
        match (&self.bar, state) {
            (Some(bar), RequirementState::Checking) => {
                bar.set_message(format!("checking {}", requirement));
            }
            (Some(bar), RequirementState::Installing) => {
                bar.set_message(format!("installing {}", requirement));
            }
            (Some(bar), _) => {
                bar.inc(1);
                bar.println(format!("  {} {}", status_symbol(state), requirement));
            }
            (None, RequirementState::Installing) => {
                println!("  {} {}", style("installing").dim(), requirement);
            }
            (None, RequirementState::Checking) => {}
            (None, _) => println!("  {} {}", status_symbol(state), requirement),
        }
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}

fn status_symbol(state: RequirementState) -> console::StyledObject<&'static str> {
    match state {
        RequirementState::Satisfied => style("[OK]").green(),
        RequirementState::Installed => style("[NEW]").cyan(),
        RequirementState::Failed => style("[FAIL]").red(),
        RequirementState::Checking | RequirementState::Installing => style("[..]").dim(),
    }
}
