//! How much of the terminal UI a command may use

use std::io::IsTerminal;

/// Environment variables set by common CI providers
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TF_BUILD",
];

/// Output mode of one command invocation
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
    skip_prompts: bool,
    quiet: bool,
}

impl UiContext {
    /// Fancy output only on a terminal outside CI
    pub fn detect() -> Self {
        let tty = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();
        Self {
            interactive: is_interactive(tty, |var| std::env::var_os(var).is_some()),
            skip_prompts: false,
            quiet: false,
        }
    }

    /// Plain output with prompts answered by their defaults
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            skip_prompts: false,
            quiet: false,
        }
    }

    /// Continue without waiting for the user (`--noninteractive`)
    pub fn with_auto_yes(mut self, skip: bool) -> Self {
        self.skip_prompts = skip;
        self
    }

    /// Suppress step and progress output while a report goes to stdout
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self.interactive &= !quiet;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn auto_yes(&self) -> bool {
        self.skip_prompts
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Spinners, progress bars and cliclack log steps
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }
}

fn is_interactive(tty: bool, is_set: impl Fn(&str) -> bool) -> bool {
    tty && !CI_VARS.iter().any(|var| is_set(var))
}
