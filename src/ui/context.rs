//! Whether output goes to a person or to a log

use std::io::IsTerminal;

/// Environment variables set by common CI systems
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "BUILDKITE",
    "JENKINS_URL",
    "TF_BUILD",
];

/// Forces plain output even on a terminal
const PLAIN_VAR: &str = "REQUISITE_PLAIN";

/// Output mode for one command invocation
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    interactive: bool,
    auto_yes: bool,
}

impl UiContext {
    /// Detect from the process terminal and environment
    pub fn detect() -> Self {
        let tty = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();
        Self::from_env(tty, |name| std::env::var_os(name).is_some())
    }

    fn from_env(tty: bool, is_set: impl Fn(&str) -> bool) -> Self {
        let ci = CI_VARS.iter().any(|name| is_set(name));
        Self {
            interactive: tty && !ci && !is_set(PLAIN_VAR),
            auto_yes: false,
        }
    }

    /// Plain output, prompts answered with their default
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            auto_yes: false,
        }
    }

    /// Answer every prompt with yes
    pub fn with_auto_yes(mut self, yes: bool) -> Self {
        self.auto_yes = yes;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    /// Spinners, progress bars and cliclack framing
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }
}
