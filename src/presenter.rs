//! Rendering side of the toast manager.
//!
//! A presenter only reads snapshots; the single way back into the manager is
//! the [`ToastControls`] handle (close button, action button).

use std::fmt::Write as FmtWrite;
use std::io::{self, Write};

use tokio::sync::watch;
use tracing::{debug, warn};

pub use crate::toast::ToastControls;
use crate::toast::ToastEntry;
use crate::types::ToastStatus;

pub trait ToastRenderer {
    /// Draw the full active set, oldest first.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the output the renderer writes to.
    fn render(&mut self, entries: &[ToastEntry], controls: &ToastControls) -> io::Result<()>;
}

/// Re-render on every snapshot until the manager is gone.
pub async fn run_presenter<R>(
    mut snapshots: watch::Receiver<Vec<ToastEntry>>,
    controls: ToastControls,
    mut renderer: R,
) where
    R: ToastRenderer,
{
    loop {
        let entries = snapshots.borrow_and_update().clone();
        if let Err(err) = renderer.render(&entries, &controls) {
            warn!(error = %err, "failed to render toasts");
        }
        if snapshots.changed().await.is_err() {
            break;
        }
    }
    debug!("toast manager dropped, presenter stopping");
}

/// Plain-text renderer, one block per toast.
pub struct ConsoleRenderer<W> {
    out: W,
}

impl<W: Write> ConsoleRenderer<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ToastRenderer for ConsoleRenderer<W> {
    fn render(&mut self, entries: &[ToastEntry], _controls: &ToastControls) -> io::Result<()> {
        self.out.write_all(format_entries(entries).as_bytes())?;
        self.out.flush()
    }
}

pub const fn glyph(status: ToastStatus) -> &'static str {
    match status {
        ToastStatus::Loading => "⟳",
        ToastStatus::Success => "✓",
        ToastStatus::Error => "✗",
    }
}

pub fn format_entries(entries: &[ToastEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "toasts ({})", entries.len());
    for entry in entries {
        let _ = write!(out, "  {} {}", glyph(entry.status), entry.message.title);
        if let Some(action) = &entry.action {
            let _ = write!(out, " [{}]", action.label());
        }
        out.push('\n');
        if let Some(description) = &entry.message.description {
            let _ = writeln!(out, "    {description}");
        }
    }
    out
}
