//! `cameko groups` / `cameko members`: browse the roster.

use crate::context::Session;
use crate::output::{CliError, OutputMode, pretty_section, render_mode, report_error};
use cameko_core::directory::Group;
use cameko_core::error::CamekoError;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct MembersArgs {
    /// Group to list (default: the selected group).
    pub group: Option<String>,
}

#[derive(Debug, Serialize)]
struct GroupRow<'a> {
    name: &'a str,
    hashtags: Vec<String>,
    members: usize,
    selected: bool,
}

pub fn run_groups(output: OutputMode, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let session = Session::open(output, state_dir)?;
    let current = &session.controller.state().selected_group;
    let rows: Vec<GroupRow<'_>> = session
        .controller
        .directory()
        .groups()
        .iter()
        .map(|g| GroupRow {
            name: &g.name,
            hashtags: g.hashtags(),
            members: g.members.len(),
            selected: &g.name == current,
        })
        .collect();

    render_mode(
        output,
        &rows,
        |rows, w| {
            for row in rows {
                writeln!(w, "{}", row.name)?;
            }
            Ok(())
        },
        |rows, w| {
            pretty_section(w, "Groups")?;
            for row in rows {
                let marker = if row.selected { "*" } else { " " };
                writeln!(
                    w,
                    "{marker} {:<10} {:>2} members  {}",
                    row.name,
                    row.members,
                    row.hashtags.join(" ")
                )?;
            }
            Ok(())
        },
    )
}

#[derive(Debug, Serialize)]
struct MemberRow<'a> {
    name: &'a str,
    account: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_url: Option<&'a str>,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct MembersReport<'a> {
    group: &'a str,
    members: Vec<MemberRow<'a>>,
}

fn members_report<'a>(
    group: &'a Group,
    selected: &[String],
    is_current: bool,
) -> MembersReport<'a> {
    MembersReport {
        group: &group.name,
        members: group
            .members
            .iter()
            .map(|m| MemberRow {
                name: &m.name,
                account: &m.account,
                profile_url: m.profile_url.as_deref(),
                selected: is_current && selected.contains(&m.name),
            })
            .collect(),
    }
}

pub fn run_members(
    args: &MembersArgs,
    output: OutputMode,
    state_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let session = Session::open(output, state_dir)?;
    let state = session.controller.state();
    let name = args.group.as_deref().unwrap_or(&state.selected_group);

    let Some(group) = session.controller.directory().group(name) else {
        let known: Vec<&str> = session.controller.directory().group_names().collect();
        let err = CamekoError::UnknownGroup {
            name: name.to_string(),
        };
        return Err(report_error(
            output,
            CliError::from(&err).with_suggestion(format!("known groups: {}", known.join(", "))),
        ));
    };

    let report = members_report(
        group,
        &state.selected_members,
        group.name == state.selected_group,
    );
    render_mode(
        output,
        &report,
        |report, w| {
            for m in &report.members {
                writeln!(w, "{}\t@{}", m.name, m.account)?;
            }
            Ok(())
        },
        |report, w| {
            pretty_section(w, report.group)?;
            for m in &report.members {
                let marker = if m.selected { "[x]" } else { "[ ]" };
                writeln!(w, "{marker} {:<12} @{}", m.name, m.account)?;
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cameko_core::Directory;

    #[test]
    fn members_report_marks_selection_only_for_current_group() {
        let dir = Directory::builtin();
        let group = dir.group("ニアジョイ").expect("group");
        let selected = vec!["市原 愛弓".to_string()];

        let current = members_report(group, &selected, true);
        assert_eq!(current.group, "ニアジョイ");
        assert!(current.members.iter().any(|m| m.name == "市原 愛弓" && m.selected));
        assert_eq!(current.members.iter().filter(|m| m.selected).count(), 1);

        let other = members_report(group, &selected, false);
        assert!(other.members.iter().all(|m| !m.selected));
    }
}
