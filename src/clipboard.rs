//! Copying the converted markdown to the system clipboard.
//!
//! On macOS `pbcopy` is tried first. Everywhere else (and as the macOS
//! fallback) the text is sent to the terminal as an OSC 52 sequence, which
//! works over SSH as long as the terminal allows clipboard writes.

use std::io::{Write, stdout};

use base64::Engine;

use crate::normalize::canonical_newlines;

/// Something that can receive copied text.
pub trait Clipboard {
    /// # Errors
    /// Returns an error if the text could not be handed to the clipboard.
    fn copy(&mut self, text: &str) -> std::io::Result<()>;
}

/// The terminal/OS clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> std::io::Result<()> {
        #[cfg(target_os = "macos")]
        {
            if copy_to_pbcopy(text).is_ok() {
                return Ok(());
            }
        }
        copy_to_clipboard_osc52(text)
    }
}

/// The exact text placed on the clipboard for already-normalized markdown.
pub fn clipboard_text(normalized: &str) -> String {
    canonical_newlines(normalized)
}

#[cfg(target_os = "macos")]
fn copy_to_pbcopy(text: &str) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let mut child = Command::new("pbcopy").stdin(Stdio::piped()).spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other("pbcopy failed"))
    }
}

fn copy_to_clipboard_osc52(text: &str) -> std::io::Result<()> {
    let mut out = stdout();
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}
