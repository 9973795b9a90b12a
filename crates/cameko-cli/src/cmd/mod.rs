pub mod completions;
pub mod config;
pub mod directory;
pub mod export;
pub mod flag;
pub mod group;
pub mod member;
pub mod reset;
pub mod set;
pub mod show;

use crate::context::Session;
use crate::output::{
    CliError, OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode, report_error,
};
use cameko_core::error::CamekoError;
use cameko_core::{Action, Flag, FormState, TextField};
use serde::Serialize;
use std::io::{self, Write};

/// State plus generated text, as printed after every edit.
#[derive(Debug, Serialize)]
pub struct FormReport<'a> {
    pub state: &'a FormState,
    pub text: &'a str,
}

impl<'a> FormReport<'a> {
    pub fn of(session: &'a Session) -> Self {
        Self {
            state: session.controller.state(),
            text: session.controller.text(),
        }
    }
}

/// Print the form: just the text for pipes, fields and preview for humans.
pub fn render_form(output: OutputMode, session: &Session) -> anyhow::Result<()> {
    render_mode(
        output,
        &FormReport::of(session),
        |report, w| writeln!(w, "{}", report.text),
        |report, w| write_pretty_form(w, report),
    )
}

fn write_pretty_form(w: &mut dyn Write, report: &FormReport<'_>) -> io::Result<()> {
    let state = report.state;
    pretty_section(w, "Form")?;
    pretty_kv(w, "group", &state.selected_group)?;
    let members = if state.selected_members.is_empty() {
        "(none)".to_string()
    } else {
        state.selected_members.join(", ")
    };
    pretty_kv(w, "members", members)?;
    for field in TextField::ALL {
        pretty_kv(w, field.key(), state.text(field))?;
    }
    for flag in Flag::ALL {
        pretty_kv(w, flag.key(), if state.flag(flag) { "on" } else { "off" })?;
    }
    writeln!(w)?;
    pretty_section(w, "Post")?;
    writeln!(w, "{}", report.text)?;
    pretty_rule(w)
}

/// Dispatch one edit; unknown names are rendered with the valid choices.
pub fn apply(output: OutputMode, session: &mut Session, action: Action) -> anyhow::Result<()> {
    let result = session.controller.dispatch(action).map(|_| ());
    if let Err(err) = result {
        let cli_err = match &err {
            CamekoError::UnknownGroup { .. } => {
                let names: Vec<&str> = session.controller.directory().group_names().collect();
                CliError::from(&err).with_suggestion(format!("known groups: {}", names.join(", ")))
            }
            CamekoError::UnknownMember { .. } => {
                let names: Vec<&str> = session
                    .controller
                    .selected_group()
                    .map(|g| g.members.iter().map(|m| m.name.as_str()).collect())
                    .unwrap_or_default();
                let group = &session.controller.state().selected_group;
                CliError::from(&err)
                    .with_suggestion(format!("members of {group}: {}", names.join(", ")))
            }
            _ => CliError::from(&err),
        };
        return Err(report_error(output, cli_err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_form_lists_fields_and_post() {
        let mut state = FormState::default();
        state.event_title = "定期公演".into();
        state.reverse_order = true;
        let report = FormReport {
            state: &state,
            text: "定期公演",
        };

        let mut buf = Vec::new();
        write_pretty_form(&mut buf, &report).expect("write");
        let out = String::from_utf8(buf).expect("utf8");
        assert!(out.contains("group:"));
        assert!(out.contains("イコラブ"));
        assert!(out.contains("members:"));
        assert!(out.contains("(none)"));
        assert!(out.contains("title:"));
        assert!(out.contains("reverse:"));
        assert!(out.contains("Post\n"));
    }

    #[test]
    fn report_serializes_state_and_text() {
        let state = FormState::default();
        let report = FormReport {
            state: &state,
            text: "@",
        };
        let v = serde_json::to_value(&report).expect("json");
        assert_eq!(v["text"], "@");
        assert_eq!(v["state"]["selectedGroup"], "イコラブ");
    }
}
