//! `cameko reset`: forget the saved form.

use crate::context::Session;
use crate::output::{CliError, OutputMode, report_error};
use std::path::Path;

pub fn run_reset(output: OutputMode, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let mut session = Session::open(output, state_dir)?;
    session
        .controller
        .clear_saved()
        .map_err(|e| report_error(output, CliError::from(&e)))?;
    tracing::info!(state_dir = %session.config.state_dir.display(), "saved form cleared");
    super::render_form(output, &session)
}
