use arboard::Clipboard;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard, opened on first use and kept for the lifetime of the
/// value so the copied text stays owned on platforms that serve it lazily.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().map_err(|err| ClipboardError::Unavailable(err.to_string()))?,
        };
        let written = clipboard
            .set_text(text.to_owned())
            .map_err(|err| ClipboardError::Write(err.to_string()));
        self.inner = Some(clipboard);
        written
    }
}

/// Fire-and-forget copy. Errors are logged and collapsed into `false`.
pub fn copy_text<C>(clipboard: &mut C, text: &str) -> bool
where
    C: ClipboardSink + ?Sized,
{
    match clipboard.set_text(text) {
        Ok(()) => {
            debug!(chars = text.chars().count(), "copied text to clipboard");
            true
        }
        Err(err) => {
            warn!("failed to copy text: {err}");
            false
        }
    }
}
