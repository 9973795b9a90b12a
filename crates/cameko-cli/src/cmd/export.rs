//! `cameko copy` / `cameko post`: hand the post to the clipboard or browser.

use crate::context::Session;
use crate::output::{CliError, OutputMode, pretty_kv, render, report_error};
use crate::system::SystemExporter;
use cameko_core::error::CamekoError;
use cameko_core::export::ExportKind;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Args, Debug)]
pub struct PostArgs {
    /// Print the compose URL instead of opening a browser.
    #[arg(long)]
    pub print_url: bool,
}

#[derive(Debug, Serialize)]
struct ExportReport<'a> {
    action: &'static str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

fn export_failed(output: OutputMode, err: &CamekoError, text: &str) -> anyhow::Error {
    // The text is still useful; print it so nothing is lost.
    if !output.is_json() {
        println!("{text}");
    }
    report_error(output, CliError::from(err))
}

pub fn run_copy(output: OutputMode, quiet: bool, state_dir: Option<&Path>) -> anyhow::Result<()> {
    let session = Session::open(output, state_dir)?;
    let controller = &session.controller;
    let result = controller.export(
        ExportKind::Copy,
        &SystemExporter::one_shot(),
        session.compose_base(),
    );
    if let Err(err) = result {
        return Err(export_failed(output, &err, controller.text()));
    }

    let report = ExportReport {
        action: "copy",
        text: controller.text(),
        url: None,
    };
    if quiet && !output.is_json() {
        return Ok(());
    }
    render(output, &report, |report, w| {
        writeln!(w, "copied {} characters", report.text.chars().count())
    })
}

pub fn run_post(
    args: &PostArgs,
    output: OutputMode,
    quiet: bool,
    state_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let session = Session::open(output, state_dir)?;
    let controller = &session.controller;
    let base = session.compose_base();

    // Printing the URL is not a post; no analytics event is sent.
    if args.print_url {
        let report = ExportReport {
            action: "post",
            text: controller.text(),
            url: Some(controller.compose_url(base)),
        };
        return render(output, &report, |r, w| {
            writeln!(w, "{}", r.url.as_deref().unwrap_or_default())
        });
    }

    let url = match controller.export(ExportKind::Post, &SystemExporter::one_shot(), base) {
        Ok(url) => url.unwrap_or_else(|| controller.compose_url(base)),
        Err(err) => return Err(export_failed(output, &err, &controller.compose_url(base))),
    };

    let report = ExportReport {
        action: "post",
        text: controller.text(),
        url: Some(url),
    };
    if quiet && !output.is_json() {
        return Ok(());
    }
    render(output, &report, |r, w| {
        writeln!(w, "opened compose page")?;
        pretty_kv(w, "characters", r.text.chars().count().to_string())
    })
}
