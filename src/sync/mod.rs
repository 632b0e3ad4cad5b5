//! Scroll synchronization between the editor and the preview.

mod accessor;
mod controller;
mod metrics;

pub use accessor::{LayeredAccessor, LookupStrategy, ScrollAccessor, ScrollView};
pub use controller::{
    ScrollSyncController, SyncOptions, SyncOutcome, SyncState, DEFAULT_SETTLE_WINDOW,
};
pub use metrics::{compute_scroll_sync, ScrollMetrics};
