//! Line-oriented output with a plain-text fallback

use super::context::UiContext;
use console::{style, StyledObject};

/// Severity of a step line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Info,
    Warn,
    Fail,
}

impl Level {
    /// Bracketed tag used in plain output
    fn tag(self) -> StyledObject<&'static str> {
        match self {
            Level::Ok => style("[OK]").green(),
            Level::Info => style("[INFO]").cyan(),
            Level::Warn => style("[WARN]").yellow(),
            Level::Fail => style("[FAIL]").red(),
        }
    }

    fn log(self, message: String) {
        let _ = match self {
            Level::Ok => cliclack::log::success(message),
            Level::Info => cliclack::log::info(message),
            Level::Warn => cliclack::log::warning(message),
            Level::Fail => cliclack::log::error(message),
        };
    }
}

/// Title line at the start of a command
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).cyan().bold());
        println!();
    }
}

/// Closing line of a command
pub fn outro(ctx: &UiContext, ok: bool, message: &str) {
    if ctx.use_fancy_output() {
        let styled = if ok {
            style(message).green().bold()
        } else {
            style(message).red().bold()
        };
        cliclack::outro(styled).ok();
    } else {
        let tag = if ok {
            Level::Ok.tag()
        } else {
            style("[ERROR]").red()
        };
        println!();
        println!("{} {}", tag, message);
    }
}

/// Bold heading between groups of lines
pub fn section(ctx: &UiContext, title: &str) {
    println!();
    if ctx.use_fancy_output() {
        cliclack::log::info(style(title).bold()).ok();
    } else {
        println!("{}", style(title).bold());
    }
}

/// One step line
pub fn step(ctx: &UiContext, level: Level, message: &str) {
    if ctx.use_fancy_output() {
        level.log(message.to_string());
    } else {
        println!("  {} {}", level.tag(), message);
    }
}

/// A step line with a dimmed detail (a path, a hint, a reason)
pub fn step_detail(ctx: &UiContext, level: Level, message: &str, detail: &str) {
    if ctx.use_fancy_output() {
        level.log(format!("{} ({})", message, style(detail).dim()));
    } else {
        println!("  {} {} ({})", level.tag(), message, detail);
    }
}

/// `key: value` line
pub fn field(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// `key: value` line colored by whether the value is the healthy one
pub fn field_status(ctx: &UiContext, key: &str, value: &str, ok: bool) {
    if ctx.use_fancy_output() {
        let value = if ok {
            style(value).green()
        } else {
            style(value).yellow()
        };
        println!("  {}: {}", style(key).dim(), value);
    } else {
        let level = if ok { Level::Ok } else { Level::Warn };
        println!("  {} {}: {}", level.tag(), key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tags() {
        let plain = |level: Level| console::strip_ansi_codes(&level.tag().to_string()).into_owned();
        assert_eq!(plain(Level::Ok), "[OK]");
        assert_eq!(plain(Level::Warn), "[WARN]");
        assert_eq!(plain(Level::Fail), "[FAIL]");
    }

    #[test]
    fn output_non_interactive() {
        let ctx = UiContext::non_interactive();
        // These should not panic
        intro(&ctx, "Test");
        section(&ctx, "Requirements");
        step(&ctx, Level::Info, "No requirements");
        step_detail(&ctx, Level::Ok, "hello==1.0.0", "installed");
        field_status(&ctx, "Virtual env", "no", false);
        outro(&ctx, true, "Done");
        outro(&ctx, false, "Failed");
    }
}
