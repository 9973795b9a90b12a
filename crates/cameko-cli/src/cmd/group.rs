//! `cameko group`: select the group.

use crate::context::Session;
use crate::output::OutputMode;
use cameko_core::Action;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Group name as listed by `cameko groups`.
    pub name: String,
}

pub fn run_group(
    args: &GroupArgs,
    output: OutputMode,
    state_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = Session::open(output, state_dir)?;
    super::apply(output, &mut session, Action::SelectGroup(args.name.clone()))?;
    super::render_form(output, &session)
}
