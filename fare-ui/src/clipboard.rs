//! Clipboard boundary for exporting the ticket change summary.
//!
//! The session only sees the [`Clipboard`] trait. Writing may suspend and may
//! fail; a failure is reported to the user but never rolls back any other
//! state.

use std::{
    io::{self, Write},
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard is unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write failed: {0}")]
    Io(#[from] io::Error),
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Keeps every written text in memory. Can be switched into a failing mode
/// to stand in for a denied clipboard permission.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MemoryClipboard {
    pub fn failing() -> Self {
        let clipboard = Self::default();
        clipboard.set_failing(true);
        clipboard
    }

    pub fn set_failing(
        &self,
        fail: bool,
    ) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
        self.writes().pop()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ClipboardError::Unavailable("permission denied".to_string()));
        }
        self.writes
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".to_string()))?
            .push(text.to_string());
        Ok(())
    }
}

/// Writes the summary to a file, replacing its contents.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Clipboard for FileClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}

/// Prints the summary on standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutClipboard;

#[async_trait]
impl Clipboard for StdoutClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}
