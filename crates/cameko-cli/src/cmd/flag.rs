//! `cameko flag`: switch a formatting option.

use crate::context::Session;
use crate::output::OutputMode;
use cameko_core::{Action, Flag};
use clap::{Args, ValueEnum};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlagMode {
    On,
    Off,
    Toggle,
}

#[derive(Args, Debug)]
pub struct FlagArgs {
    /// Option to switch: member-hashtag, reverse, parentheses.
    pub flag: Flag,

    #[arg(value_enum, default_value_t = FlagMode::Toggle)]
    pub mode: FlagMode,
}

impl FlagArgs {
    const fn action(&self) -> Action {
        match self.mode {
            FlagMode::On => Action::SetFlag(self.flag, true),
            FlagMode::Off => Action::SetFlag(self.flag, false),
            FlagMode::Toggle => Action::ToggleFlag(self.flag),
        }
    }
}

pub fn run_flag(
    args: &FlagArgs,
    output: OutputMode,
    state_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = Session::open(output, state_dir)?;
    super::apply(output, &mut session, args.action())?;
    tracing::debug!(
        flag = args.flag.key(),
        value = session.controller.state().flag(args.flag),
        "flag updated"
    );
    super::render_form(output, &session)
}
