//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Colors of the status markers. Plain by default.
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    /// In-progress steps.
    pub step: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.step = Style::new().cyan();
    }
}
