//! Editor/preview scroll synchronization state machine.
//!
//! Scroll events carry no hint of whether the user or the program moved
//! the view. After the controller writes to one view it therefore holds a
//! latch for a short settle window, and scroll events from that view are
//! ignored until the latch is released by [`ScrollSyncController::tick`] or
//! by a later event arriving after the deadline.

use super::accessor::{ScrollAccessor, ScrollView};
use super::metrics::compute_scroll_sync;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default settle window after a programmatic scroll.
pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_millis(100);

/// Which view, if any, is currently driving the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Neither view is driving
    #[default]
    Idle,
    /// The editor moved the preview; preview events are ignored until `until`
    DrivenByEditor { until: Instant },
    /// The preview moved the editor; editor events are ignored until `until`
    DrivenByPreview { until: Instant },
}

impl SyncState {
    fn deadline(&self) -> Option<Instant> {
        match self {
            SyncState::Idle => None,
            SyncState::DrivenByEditor { until } | SyncState::DrivenByPreview { until } => {
                Some(*until)
            }
        }
    }
}

/// What the controller did in response to a scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// The opposite view was moved to `target_scroll_top`
    Applied { target_scroll_top: f64 },
    /// The event echoed the controller's own write and was ignored
    Suppressed,
    /// Synchronization is switched off
    Disabled,
    /// One of the views has nothing to scroll
    NoOverflow,
    /// A scroll container could not be located this tick
    TargetMissing,
}

impl SyncOutcome {
    /// Returns true if a view was moved.
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied { .. })
    }
}

/// Scroll synchronization settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    /// Master switch
    pub enabled: bool,

    /// How long events from a freshly written view are ignored
    #[serde(rename = "settle_window_ms", with = "duration_ms")]
    pub settle_window: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            settle_window: DEFAULT_SETTLE_WINDOW,
        }
    }
}

impl SyncOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the settle window.
    pub fn with_settle_window(mut self, window: Duration) -> Self {
        self.settle_window = window;
        self
    }

    /// Turns synchronization off.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Keeps an editor and a preview scrolled to the same relative position.
#[derive(Debug)]
pub struct ScrollSyncController<E, P> {
    editor: E,
    preview: P,
    options: SyncOptions,
    state: SyncState,
}

impl<E, P> ScrollSyncController<E, P>
where
    E: ScrollAccessor,
    P: ScrollAccessor,
{
    /// Creates a controller with default options.
    pub fn new(editor: E, preview: P) -> Self {
        Self::with_options(editor, preview, SyncOptions::default())
    }

    /// Creates a controller with the given options.
    pub fn with_options(editor: E, preview: P, options: SyncOptions) -> Self {
        Self {
            editor,
            preview,
            options,
            state: SyncState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Current options.
    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    /// Returns true if synchronization is on.
    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    /// Switches synchronization on or off. Switching resets to idle.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.options.enabled = enabled;
        self.state = SyncState::Idle;
    }

    /// Mutable access to the editor accessor.
    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    /// Mutable access to the preview accessor.
    pub fn preview_mut(&mut self) -> &mut P {
        &mut self.preview
    }

    /// Releases the latch once its settle window has passed.
    ///
    /// Returns true if the state went back to idle.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.state.deadline() {
            Some(until) if now >= until => {
                debug!("settle window elapsed");
                self.state = SyncState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Handles a scroll event from the editor.
    pub fn on_editor_scroll(&mut self, now: Instant) -> SyncOutcome {
        if !self.options.enabled {
            return SyncOutcome::Disabled;
        }
        self.tick(now);

        if matches!(self.state, SyncState::DrivenByPreview { .. }) {
            debug!("editor scroll suppressed");
            return SyncOutcome::Suppressed;
        }

        let until = now + self.options.settle_window;
        let outcome = sync_pair(&mut self.editor, &mut self.preview, || {
            self.state = SyncState::DrivenByEditor { until };
        });
        debug!(?outcome, "editor → preview");
        outcome
    }

    /// Handles a scroll event from the preview.
    pub fn on_preview_scroll(&mut self, now: Instant) -> SyncOutcome {
        if !self.options.enabled {
            return SyncOutcome::Disabled;
        }
        self.tick(now);

        if matches!(self.state, SyncState::DrivenByEditor { .. }) {
            debug!("preview scroll suppressed");
            return SyncOutcome::Suppressed;
        }

        let until = now + self.options.settle_window;
        let outcome = sync_pair(&mut self.preview, &mut self.editor, || {
            self.state = SyncState::DrivenByPreview { until };
        });
        debug!(?outcome, "preview → editor");
        outcome
    }
}

/// Copies the relative position of `source` onto `target`.
///
/// `latch` runs after the target position is known and before it is written.
fn sync_pair<S, T, L>(source: &mut S, target: &mut T, latch: L) -> SyncOutcome
where
    S: ScrollAccessor,
    T: ScrollAccessor,
    L: FnOnce(),
{
    let Some(source_view) = source.locate() else {
        return SyncOutcome::TargetMissing;
    };
    let Some(mut target_view) = target.locate() else {
        return SyncOutcome::TargetMissing;
    };

    match compute_scroll_sync(&source_view.metrics(), &target_view.metrics()) {
        Some(target_scroll_top) => {
            latch();
            target_view.set_scroll_top(target_scroll_top);
            SyncOutcome::Applied { target_scroll_top }
        }
        None => SyncOutcome::NoOverflow,
    }
}
