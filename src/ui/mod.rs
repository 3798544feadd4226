//! UI module for consistent CLI output
//!
//! Uses `cliclack` for interactive prompts and log steps with automatic
//! fallback to plain output in CI/non-interactive environments, and
//! `indicatif` for the copy progress bar.

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, outro_warn, remark, section, step_info, step_ok_detail,
    step_warn, step_warn_hint,
};
pub use progress::{CopyProgress, TaskSpinner};
pub use prompts::confirm_continue;
pub use theme::{init_theme, DcdumpTheme};
