//! `cameko member`: select or deselect members of the selected group.

use crate::context::Session;
use crate::output::OutputMode;
use cameko_core::Action;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct MemberArgs {
    /// Member names, in the order they should appear.
    #[arg(required_unless_present = "clear")]
    pub names: Vec<String>,

    /// Select the members instead of toggling.
    #[arg(long, conflicts_with = "off")]
    pub on: bool,

    /// Deselect the members instead of toggling.
    #[arg(long)]
    pub off: bool,

    /// Deselect everyone first.
    #[arg(long)]
    pub clear: bool,
}

impl MemberArgs {
    fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.names.len() + 1);
        if self.clear {
            actions.push(Action::ClearMembers);
        }
        actions.extend(self.names.iter().map(|name| {
            if self.on {
                Action::SetMemberSelected {
                    name: name.clone(),
                    selected: true,
                }
            } else if self.off {
                Action::SetMemberSelected {
                    name: name.clone(),
                    selected: false,
                }
            } else {
                Action::ToggleMember(name.clone())
            }
        }));
        actions
    }
}

/// Each name is its own edit; the first unknown name stops the run.
pub fn run_member(
    args: &MemberArgs,
    output: OutputMode,
    state_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = Session::open(output, state_dir)?;
    for action in args.actions() {
        super::apply(output, &mut session, action)?;
    }
    super::render_form(output, &session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(names: &[&str]) -> MemberArgs {
        MemberArgs {
            names: names.iter().map(ToString::to_string).collect(),
            on: false,
            off: false,
            clear: false,
        }
    }

    #[test]
    fn toggles_by_default() {
        assert_eq!(
            args(&["a", "b"]).actions(),
            [
                Action::ToggleMember("a".into()),
                Action::ToggleMember("b".into())
            ]
        );
    }

    #[test]
    fn clear_runs_first() {
        let mut a = args(&["a"]);
        a.clear = true;
        a.on = true;
        assert_eq!(
            a.actions(),
            [
                Action::ClearMembers,
                Action::SetMemberSelected {
                    name: "a".into(),
                    selected: true
                }
            ]
        );
    }
}
