//! Best-effort clipboard writes.
//!
//! Primary path is `arboard`, which talks to the platform clipboard directly.
//! When that fails (headless session, missing display server, denied access)
//! we fall back to piping the text into a transient platform copy helper.
//! The child process is always reaped or killed, whatever happens to the
//! write itself. Callers cannot tell which path ran.

use std::io::Write;
use std::process::{Child, Command, Stdio};

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Candidate fallback helpers, tried in order at construction time.
const FALLBACK_CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

pub struct ClipboardHelper {
    fallback: Option<(String, Vec<String>)>,
}

impl Default for ClipboardHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardHelper {
    pub fn new() -> Self {
        Self {
            fallback: detect_fallback(),
        }
    }

    /// Copy `text`: primary clipboard first, helper process on any failure.
    pub fn copy(&self, text: &str) -> Result<()> {
        match copy_primary(text) {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!("clipboard write failed, trying fallback helper: {err}");
                self.copy_fallback(text)
            }
        }
    }

    fn copy_fallback(&self, text: &str) -> Result<()> {
        let (program, args) = self
            .fallback
            .as_ref()
            .context("no clipboard helper available on this system")?;
        copy_via_command(program, args, text)
    }
}

fn copy_primary(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
    clipboard
        .set_text(text)
        .context("clipboard write rejected")?;
    Ok(())
}

fn detect_fallback() -> Option<(String, Vec<String>)> {
    for (program, args) in FALLBACK_CANDIDATES {
        let found = Command::new("which")
            .arg(program)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if found {
            return Some((
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
        }
    }
    None
}

/// Reaps the child on drop if nobody waited for it, so a failed write never
/// leaks a process.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn wait(&mut self) -> Result<std::process::ExitStatus> {
        let status = self.child.wait().context("failed to wait for clipboard helper")?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn copy_via_command(program: &str, args: &[String], text: &str) -> Result<()> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to spawn clipboard helper '{program}'"))?;
    let mut guard = ChildGuard::new(child);

    {
        let mut stdin = guard
            .child
            .stdin
            .take()
            .context("clipboard helper has no stdin")?;
        stdin
            .write_all(text.as_bytes())
            .context("failed to write to clipboard helper")?;
        // Dropping stdin closes the pipe so the helper sees EOF.
    }

    let status = guard.wait()?;
    if !status.success() {
        bail!("clipboard helper '{program}' exited with {status}");
    }
    Ok(())
}
