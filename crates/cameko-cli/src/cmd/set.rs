//! `cameko set`: edit one text field.

use crate::context::Session;
use crate::output::OutputMode;
use cameko_core::{Action, TextField};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Field to edit: date, date-format, title, venue, venue-prefix, honorific, hashtags.
    pub field: TextField,

    /// New value. An empty string clears the field.
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

pub fn run_set(
    args: &SetArgs,
    output: OutputMode,
    state_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = Session::open(output, state_dir)?;
    let action = Action::SetText(args.field, args.value.clone());
    super::apply(output, &mut session, action)?;
    tracing::debug!(field = args.field.key(), "field updated");
    super::render_form(output, &session)
}
