//! `twitter-compose config`: print the parsed compose file.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Run `twitter-compose config`.
///
/// # Errors
///
/// Returns an error if the compose file cannot be loaded.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let config = app.load_compose()?;
    app.output.yaml(&config)?;
    Ok(ExitCode::SUCCESS)
}
