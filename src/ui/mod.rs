//! Terminal output
//!
//! Uses `cliclack` for interactive log lines and prompts and `indicatif`
//! for install progress, with plain-text fallback in CI and when output is
//! not a terminal.

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{field, field_status, intro, outro, section, step, step_detail, Level};
pub use progress::{InstallProgress, TaskSpinner};
pub use prompts::confirm;
