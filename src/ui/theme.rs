//! cliclack bar colours in Discord blurple

use cliclack::{Theme, ThemeState};
use console::Style;

/// Closest 256-colour match to #5865F2
const BLURPLE: u8 = 63;

#[derive(Debug, Clone, Default)]
pub struct DcdumpTheme;

impl Theme for DcdumpTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Active | ThemeState::Submit => Style::new().color256(BLURPLE),
        }
    }
}

pub fn init_theme() {
    cliclack::set_theme(DcdumpTheme);
}
