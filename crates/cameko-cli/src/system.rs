//! Clipboard and browser access for the export actions.
//!
//! On Linux the clipboard contents live in the process that set them. A
//! one-shot command exits right after copying, so it hands the text to a
//! detached `cameko clipboard-hold` child that keeps serving the selection
//! until another program takes it over.

use cameko_core::error::CamekoError;
use cameko_core::export::Exporter;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};

/// Hidden subcommand run by the detached clipboard holder.
pub const HOLD_COMMAND: &str = "clipboard-hold";

/// Who keeps the clipboard contents alive after a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOwner {
    /// The current process; fine when it keeps running (the TUI).
    Process,
    /// A detached helper process; used when the command exits right away.
    Helper,
}

/// [`Exporter`] backed by the desktop clipboard and default browser.
#[derive(Debug, Clone, Copy)]
pub struct SystemExporter {
    owner: ClipboardOwner,
}

impl SystemExporter {
    /// For commands that exit right after exporting.
    #[must_use]
    pub const fn one_shot() -> Self {
        let owner = if cfg!(target_os = "linux") {
            ClipboardOwner::Helper
        } else {
            ClipboardOwner::Process
        };
        Self { owner }
    }

    /// For the interactive form, which outlives the copy.
    #[must_use]
    pub const fn long_lived() -> Self {
        Self {
            owner: ClipboardOwner::Process,
        }
    }

    #[must_use]
    pub const fn owner(self) -> ClipboardOwner {
        self.owner
    }
}

fn open_clipboard() -> Result<arboard::Clipboard, CamekoError> {
    arboard::Clipboard::new().map_err(|e| {
        tracing::warn!(error = %e, "clipboard unavailable");
        CamekoError::Export(format!("clipboard unavailable: {e}"))
    })
}

fn write_failed(e: impl std::fmt::Display) -> CamekoError {
    tracing::warn!(error = %e, "clipboard write failed");
    CamekoError::Export(format!("clipboard write failed: {e}"))
}

/// Start a detached holder and pipe `text` to it.
fn spawn_holder(text: &str) -> Result<(), CamekoError> {
    // Fail here, not in the detached child, when there is no clipboard at all.
    drop(open_clipboard()?);

    let exe = std::env::current_exe().map_err(write_failed)?;
    let mut child = Command::new(exe)
        .arg(HOLD_COMMAND)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(write_failed)?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| write_failed("holder stdin not captured"))?;
    stdin.write_all(text.as_bytes()).map_err(write_failed)?;
    tracing::debug!(pid = child.id(), "clipboard holder started");
    Ok(())
}

/// Body of `cameko clipboard-hold`: read the text from `input`, set it and
/// block until another program replaces the clipboard contents.
///
/// # Errors
///
/// Fails when `input` is unreadable or the clipboard rejects the text.
pub fn hold_clipboard(mut input: impl Read) -> Result<(), CamekoError> {
    let mut text = String::new();
    input.read_to_string(&mut text).map_err(write_failed)?;
    let mut clipboard = open_clipboard()?;

    #[cfg(target_os = "linux")]
    {
        use arboard::SetExtLinux;
        clipboard.set().wait().text(text).map_err(write_failed)
    }
    #[cfg(not(target_os = "linux"))]
    {
        clipboard.set_text(text).map_err(write_failed)
    }
}

/// [`hold_clipboard`] fed from stdin.
///
/// # Errors
///
/// See [`hold_clipboard`].
pub fn hold_clipboard_from_stdin() -> Result<(), CamekoError> {
    hold_clipboard(io::stdin().lock())
}

impl Exporter for SystemExporter {
    fn copy_text(&self, text: &str) -> Result<(), CamekoError> {
        match self.owner {
            ClipboardOwner::Helper => spawn_holder(text)?,
            ClipboardOwner::Process => open_clipboard()?.set_text(text).map_err(write_failed)?,
        }
        tracing::debug!(chars = text.chars().count(), "copied post to clipboard");
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<(), CamekoError> {
        if let Err(e) = open::that(url) {
            tracing::warn!(error = %e, "failed to open browser");
            return Err(CamekoError::Export(format!("failed to open browser: {e}")));
        }
        tracing::debug!("opened compose page");
        Ok(())
    }
}
