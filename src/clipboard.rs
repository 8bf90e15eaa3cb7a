use arboard::Clipboard;
use log::warn;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("clipboard error: {0}")]
pub struct ClipboardError(#[from] arboard::Error);

pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard. The handle is kept for the lifetime of the app since
/// some X11 setups drop the selection as soon as it is released.
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                warn!("Clipboard unavailable at startup: {}", e);
                None
            }
        };
        SystemClipboard { inner }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            self.inner = Some(Clipboard::new()?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard.set_text(text.to_owned())?;
        }
        Ok(())
    }
}
