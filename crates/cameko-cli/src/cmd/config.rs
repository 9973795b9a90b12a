use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_mode, report_error};
use anyhow::Result;
use cameko_core::config::{EffectiveConfig, resolve_config};
use clap::Subcommand;
use std::io::{self, Write};
use std::path::Path;

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show,
}

pub fn run_config(
    command: &ConfigCommand,
    output: OutputMode,
    state_dir: Option<&Path>,
) -> Result<()> {
    match command {
        ConfigCommand::Show => run_show(output, state_dir),
    }
}

fn run_show(output: OutputMode, state_dir: Option<&Path>) -> Result<()> {
    let effective =
        resolve_config(state_dir).map_err(|e| report_error(output, CliError::from(&e)))?;
    render_mode(output, &effective, write_text, write_pretty)
}

fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
}

fn write_text(value: &EffectiveConfig, w: &mut dyn Write) -> io::Result<()> {
    let user = &value.user;
    writeln!(w, "config_path={}", display_path(value.config_path.as_deref()))?;
    writeln!(w, "state_dir={}", value.state_dir.display())?;
    writeln!(w, "compose.base_url={}", user.compose.base_url)?;
    writeln!(w, "analytics.enabled={}", user.analytics.enabled)?;
    writeln!(
        w,
        "analytics.endpoint={}",
        user.analytics.endpoint.as_deref().unwrap_or_default()
    )?;
    writeln!(w, "directory.path={}", display_path(user.directory.path.as_deref()))
}

fn write_pretty(value: &EffectiveConfig, w: &mut dyn Write) -> io::Result<()> {
    let user = &value.user;
    pretty_section(w, "Configuration")?;
    pretty_kv(w, "config file", display_path(value.config_path.as_deref()))?;
    pretty_kv(w, "state dir", value.state_dir.display().to_string())?;
    pretty_kv(w, "compose url", &user.compose.base_url)?;
    let analytics = match user.analytics.active_endpoint() {
        Some(endpoint) => format!("on ({endpoint})"),
        None => "off".to_string(),
    };
    pretty_kv(w, "analytics", analytics)?;
    let roster = user
        .directory
        .path
        .as_deref()
        .map_or_else(|| "built-in".to_string(), |p| p.display().to_string());
    pretty_kv(w, "roster", roster)
}
