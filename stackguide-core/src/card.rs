use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::step::Step;

/// How long the "copied" indicator stays on after the last copy.
pub const COPY_RESET_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug)]
pub enum ClipboardError {
    Denied,
    Io(std::io::Error),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Denied => write!(f, "Clipboard access denied"),
            ClipboardError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<std::io::Error> for ClipboardError {
    fn from(value: std::io::Error) -> Self {
        ClipboardError::Io(value)
    }
}

pub trait Clipboard {
    fn write_text(&self, content: &str) -> Result<(), ClipboardError>;
}

/// Keeps the last written text. Handy for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.content.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, content: &str) -> Result<(), ClipboardError> {
        let mut slot = self.content.lock().map_err(|_| ClipboardError::Denied)?;
        *slot = Some(content.to_string());
        Ok(())
    }
}

/// Writes copied text to any writer, e.g. stdout for piping into a
/// platform clipboard tool.
pub struct WriterClipboard<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> WriterClipboard<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write> Clipboard for WriterClipboard<W> {
    fn write_text(&self, content: &str) -> Result<(), ClipboardError> {
        let mut writer = self.writer.lock().map_err(|_| ClipboardError::Denied)?;
        writer.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Code,
    Info,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Code, Tab::Info];
}

/// Interactive state of one rendered step.
///
/// `copy` must run inside a tokio runtime since the indicator reset is a
/// timer task. The task is aborted when the card is dropped.
pub struct StepCard<'a> {
    step: &'a Step,
    active_tab: Tab,
    copied: Arc<AtomicBool>,
    reset: Option<JoinHandle<()>>,
}

impl<'a> StepCard<'a> {
    pub fn new(step: &'a Step) -> Self {
        Self {
            step,
            active_tab: Tab::default(),
            copied: Arc::new(AtomicBool::new(false)),
            reset: None,
        }
    }

    pub fn step(&self) -> &Step {
        self.step
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn is_copied(&self) -> bool {
        self.copied.load(Ordering::SeqCst)
    }

    /// Copy the step's code verbatim. The indicator is set even when the
    /// clipboard refuses the write.
    pub fn copy<C: Clipboard + ?Sized>(&mut self, clipboard: &C) {
        if let Err(e) = clipboard.write_text(self.step.code_text()) {
            tracing::debug!(step = self.step.id(), error = %e, "clipboard write failed");
        }

        self.copied.store(true, Ordering::SeqCst);

        if let Some(pending) = self.reset.take() {
            pending.abort();
        }

        let copied = Arc::clone(&self.copied);
        self.reset = Some(tokio::spawn(async move {
            tokio::time::sleep(COPY_RESET_DELAY).await;
            copied.store(false, Ordering::SeqCst);
        }));
    }

    pub fn view(&self) -> CardView<'a> {
        CardView {
            step: self.step,
            active_tab: self.active_tab,
            copied: self.is_copied(),
        }
    }
}

impl Drop for StepCard<'_> {
    fn drop(&mut self) {
        if let Some(pending) = self.reset.take() {
            pending.abort();
        }
    }
}

/// Snapshot handed to templates.
#[derive(Debug, Serialize)]
pub struct CardView<'a> {
    pub step: &'a Step,
    pub active_tab: Tab,
    pub copied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DenyingClipboard;

    impl Clipboard for DenyingClipboard {
        fn write_text(&self, _content: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Denied)
        }
    }

    fn sample_step() -> Step {
        Step::new("step-1", "01", "Init").code("git init\ngit add .")
    }

    #[test]
    fn test_defaults() {
        let step = sample_step();
        let card = StepCard::new(&step);
        assert_eq!(card.active_tab(), Tab::Code);
        assert!(!card.is_copied());
    }

    #[test]
    fn test_tab_round_trip() {
        let step = sample_step();
        let mut card = StepCard::new(&step);
        card.select_tab(Tab::Info);
        assert_eq!(card.active_tab(), Tab::Info);
        card.select_tab(Tab::Info);
        assert_eq!(card.active_tab(), Tab::Info);
        card.select_tab(Tab::Code);
        assert_eq!(card.active_tab(), Tab::Code);
        assert_eq!(card.view().step.code_text(), "git init\ngit add .");
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_writes_code_verbatim() {
        let step = sample_step();
        let clipboard = MemoryClipboard::default();
        let mut card = StepCard::new(&step);
        card.copy(&clipboard);
        assert_eq!(clipboard.contents().as_deref(), Some("git init\ngit add ."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_copied_resets_after_delay() {
        let step = sample_step();
        let mut card = StepCard::new(&step);
        card.copy(&MemoryClipboard::default());
        assert!(card.is_copied());

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(card.is_copied());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!card.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_copy_extends_window() {
        let step = sample_step();
        let clipboard = MemoryClipboard::default();
        let mut card = StepCard::new(&step);

        card.copy(&clipboard);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        card.copy(&clipboard);

        // Past the first deadline, before the second.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(card.is_copied());

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert!(!card.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_clipboard_still_shows_copied() {
        let step = sample_step();
        let mut card = StepCard::new(&step);
        card.copy(&DenyingClipboard);
        assert!(card.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_reset() {
        let step = sample_step();
        let mut card = StepCard::new(&step);
        card.copy(&MemoryClipboard::default());
        let flag = Arc::clone(&card.copied);
        drop(card);

        tokio::time::sleep(COPY_RESET_DELAY * 2).await;
        // The reset never ran against the disposed card.
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_writer_clipboard_appends_newline() {
        let clipboard = WriterClipboard::new(Vec::new());
        clipboard.write_text("npx shadcn@latest init").unwrap();
        let written = clipboard.writer.into_inner().unwrap();
        assert_eq!(written, b"npx shadcn@latest init\n");
    }
}
