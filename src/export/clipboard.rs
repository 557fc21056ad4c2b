//! Clipboard Copy with Timed Acknowledgement
//!
//! This module copies document text to the system clipboard using the
//! arboard crate and tracks the short "copied" acknowledgement a UI shows
//! afterwards.
//!
//! The acknowledgement is an explicit two-state machine with a single owned
//! reset timer. Timers are cooperative: the owner calls [`CopyController::tick`]
//! from its event loop (or before rendering) and the expired timer fires there.

use crate::error::Result;
use arboard::Clipboard;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Default acknowledgement window.
pub const DEFAULT_ACK_WINDOW: Duration = Duration::from_millis(2000);

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// Failed to access clipboard
    AccessError(String),
    /// Failed to set clipboard content
    WriteError(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::AccessError(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::WriteError(msg) => write!(f, "Clipboard write error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

// ─────────────────────────────────────────────────────────────────────────────
// Backends
// ─────────────────────────────────────────────────────────────────────────────

/// Something that can receive text, normally the system clipboard.
pub trait ClipboardBackend {
    fn write_text(&mut self, text: &str) -> std::result::Result<(), ClipboardError>;
}

/// The system clipboard, opened fresh for every write.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn write_text(&mut self, text: &str) -> std::result::Result<(), ClipboardError> {
        copy_text_to_clipboard(text)
    }
}

/// Copy plain text to clipboard.
///
/// Uses arboard for cross-platform clipboard support.
pub fn copy_text_to_clipboard(text: &str) -> std::result::Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;

    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::WriteError(e.to_string()))?;

    Ok(())
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time from [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Acknowledgement State Machine
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the UI should currently show "copied" feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckState {
    Idle,
    Acknowledged { until: Instant },
}

/// The one pending Acknowledged -> Idle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ResetTimer {
    id: u64,
    deadline: Instant,
}

/// Owns the copy action and its acknowledgement state.
pub struct CopyController<B = SystemClipboard, C = SystemClock> {
    backend: B,
    clock: C,
    window: Duration,
    state: AckState,
    pending_reset: Option<ResetTimer>,
    next_timer_id: u64,
}

impl CopyController {
    /// Controller on the system clipboard and wall clock.
    pub fn system(window: Duration) -> Self {
        Self::new(SystemClipboard, SystemClock, window)
    }
}

impl<B: ClipboardBackend, C: Clock> CopyController<B, C> {
    pub fn new(backend: B, clock: C, window: Duration) -> Self {
        Self {
            backend,
            clock,
            window,
            state: AckState::Idle,
            pending_reset: None,
            next_timer_id: 0,
        }
    }

    /// Write `document` to the clipboard.
    ///
    /// On success the state becomes Acknowledged and the reset timer is
    /// replaced by a fresh one. On failure nothing changes and
    /// `ClipboardUnavailable` is returned.
    pub fn copy(&mut self, document: &str) -> Result<()> {
        if let Err(err) = self.backend.write_text(document) {
            warn!("Failed to copy to clipboard: {}", err);
            return Err(err.into());
        }

        let deadline = self.clock.now() + self.window;
        self.next_timer_id += 1;
        if let Some(previous) = self.pending_reset.replace(ResetTimer {
            id: self.next_timer_id,
            deadline,
        }) {
            debug!("Cancelled acknowledgement timer #{}", previous.id);
        }
        self.state = AckState::Acknowledged { until: deadline };

        info!(
            "Copied {} chars to clipboard (timer #{})",
            document.chars().count(),
            self.next_timer_id
        );
        Ok(())
    }

    /// Fire the reset timer if its deadline has passed.
    ///
    /// Returns `true` when the state changed to Idle.
    pub fn tick(&mut self) -> bool {
        match self.pending_reset {
            Some(timer) if self.clock.now() >= timer.deadline => {
                self.pending_reset = None;
                self.state = AckState::Idle;
                debug!("Acknowledgement timer #{} fired", timer.id);
                true
            }
            _ => false,
        }
    }

    /// True while inside the acknowledgement window of the last copy.
    pub fn is_acknowledged(&self) -> bool {
        match self.state {
            AckState::Acknowledged { until } => self.clock.now() < until,
            AckState::Idle => false,
        }
    }

    /// The stored state, as of the last `copy` or `tick`.
    pub fn state(&self) -> AckState {
        self.state
    }

    /// Time left until the pending timer fires, if any.
    pub fn time_until_reset(&self) -> Option<Duration> {
        self.pending_reset
            .map(|timer| timer.deadline.saturating_duration_since(self.clock.now()))
    }

    /// Number of pending reset timers (zero or one).
    pub fn pending_timers(&self) -> usize {
        usize::from(self.pending_reset.is_some())
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Clock that only moves when told to.
    #[derive(Clone)]
    struct ManualClock(Rc<Cell<Instant>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Rc::new(Cell::new(Instant::now())))
        }

        fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.0.get()
        }
    }

    /// Records writes; fails while `fail` is set.
    #[derive(Clone, Default)]
    struct FakeClipboard {
        contents: Rc<RefCell<Option<String>>>,
        fail: Rc<Cell<bool>>,
    }

    impl ClipboardBackend for FakeClipboard {
        fn write_text(&mut self, text: &str) -> std::result::Result<(), ClipboardError> {
            if self.fail.get() {
                return Err(ClipboardError::AccessError("permission denied".to_string()));
            }
            *self.contents.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    const WINDOW: Duration = Duration::from_millis(2000);

    fn controller() -> (CopyController<FakeClipboard, ManualClock>, FakeClipboard, ManualClock) {
        let backend = FakeClipboard::default();
        let clock = ManualClock::new();
        let controller = CopyController::new(backend.clone(), clock.clone(), WINDOW);
        (controller, backend, clock)
    }

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError::AccessError("test".to_string());
        assert!(err.to_string().contains("test"));
        let err = ClipboardError::WriteError("write failed".to_string());
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_starts_idle() {
        let (controller, _, _) = controller();
        assert_eq!(controller.state(), AckState::Idle);
        assert!(!controller.is_acknowledged());
        assert_eq!(controller.pending_timers(), 0);
        assert_eq!(controller.time_until_reset(), None);
    }

    #[test]
    fn test_copy_acknowledges_then_resets() {
        let (mut controller, backend, clock) = controller();

        controller.copy("Hello").unwrap();
        assert_eq!(backend.contents.borrow().as_deref(), Some("Hello"));
        assert!(controller.is_acknowledged());
        assert_eq!(controller.pending_timers(), 1);

        clock.advance(Duration::from_millis(1999));
        assert!(!controller.tick());
        assert!(controller.is_acknowledged());

        clock.advance(Duration::from_millis(1));
        assert!(!controller.is_acknowledged());
        assert!(controller.tick());
        assert_eq!(controller.state(), AckState::Idle);
        assert_eq!(controller.pending_timers(), 0);
    }

    #[test]
    fn test_rapid_recopy_keeps_single_timer() {
        let (mut controller, _, clock) = controller();

        for _ in 0..5 {
            controller.copy("again").unwrap();
            assert_eq!(controller.pending_timers(), 1);
            clock.advance(Duration::from_millis(500));
            assert!(!controller.tick());
        }

        // Last copy was 500ms ago; one full window must pass from it
        assert_eq!(controller.time_until_reset(), Some(Duration::from_millis(1500)));
        clock.advance(Duration::from_millis(1499));
        assert!(!controller.tick());
        assert!(controller.is_acknowledged());

        clock.advance(Duration::from_millis(1));
        assert!(controller.tick());
        assert!(!controller.is_acknowledged());
        assert!(!controller.tick());
    }

    #[test]
    fn test_failed_copy_stays_idle() {
        let (mut controller, backend, _) = controller();
        backend.fail.set(true);

        let err = controller.copy("secret").unwrap_err();
        assert!(matches!(err, Error::ClipboardUnavailable(_)));
        assert!(!controller.is_acknowledged());
        assert_eq!(controller.state(), AckState::Idle);
        assert_eq!(controller.pending_timers(), 0);
        assert!(backend.contents.borrow().is_none());
    }

    #[test]
    fn test_failed_copy_keeps_running_window() {
        let (mut controller, backend, clock) = controller();
        controller.copy("first").unwrap();

        clock.advance(Duration::from_millis(1000));
        backend.fail.set(true);
        assert!(controller.copy("second").is_err());

        // The first window is neither extended nor cut short
        assert_eq!(controller.time_until_reset(), Some(Duration::from_millis(1000)));
        clock.advance(Duration::from_millis(1000));
        assert!(controller.tick());
    }

    #[test]
    fn test_configurable_window() {
        let backend = FakeClipboard::default();
        let clock = ManualClock::new();
        let mut controller =
            CopyController::new(backend, clock.clone(), Duration::from_millis(250));

        controller.copy("x").unwrap();
        clock.advance(Duration::from_millis(250));
        assert!(controller.tick());
    }

    // Note: System clipboard tests require a display/clipboard context
    // which isn't typically available in CI environments.
}
