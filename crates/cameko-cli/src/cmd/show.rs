//! `cameko show`: print the form and the generated post.

use crate::context::Session;
use crate::output::OutputMode;
use std::path::Path;

pub fn run_show(output: OutputMode, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let session = Session::open(output, state_dir)?;
    super::render_form(output, &session)
}
