//! Application context: unified state passed to the command handler.

use crate::output::OutputContext;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Echo step output.
    pub verbose: bool,
    /// Skip interactive prompts (also set by `CI` / `MOVPN_YES` env vars).
    pub yes: bool,
}

/// Unified application context passed to the command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Echo captured stdout of every step.
    pub verbose: bool,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `MOVPN_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("MOVPN_YES").is_ok();
        Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            verbose: flags.verbose,
            non_interactive: flags.yes || ci_env,
        }
    }
}
