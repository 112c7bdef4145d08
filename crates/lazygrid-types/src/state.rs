use serde::{Deserialize, Serialize};
use std::fmt;

/// Load status of a grid instance.
///
/// `HasMore` and `Exhausted` are the two ready states; `Exhausted` is
/// terminal for the current filter fingerprint and only a filter change or
/// an explicit refresh re-arms loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    Idle,
    LoadingInitial,
    LoadingMore,
    HasMore,
    Exhausted,
    Error,
}

impl LoadStatus {
    /// Whether a proximity signal may trigger a further page fetch
    pub fn can_load_more(&self) -> bool {
        matches!(self, LoadStatus::HasMore)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::LoadingInitial | LoadStatus::LoadingMore)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoadStatus::Idle => "idle",
            LoadStatus::LoadingInitial => "loading-initial",
            LoadStatus::LoadingMore => "loading-more",
            LoadStatus::HasMore => "has-more",
            LoadStatus::Exhausted => "exhausted",
            LoadStatus::Error => "error",
        };
        write!(f, "{}", label)
    }
}

/// Per-grid-instance load state. One exists per active grid, never per
/// filter fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadState {
    pub status: LoadStatus,
    /// 1-based index of the most recently applied page
    pub current_page: u32,
    pub error: Option<String>,
}

impl LoadState {
    pub fn idle() -> Self {
        Self {
            status: LoadStatus::Idle,
            current_page: 1,
            error: None,
        }
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Geometry inputs for the viewport window calculation.
///
/// Recomputed on every scroll/resize event; purely derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Scroll offset in pixels from the top of the virtual list
    pub scroll_offset: f64,
    /// Visible container height in pixels
    pub container_height: f64,
    /// Fixed row height in pixels; must be positive
    pub row_height: f64,
    /// Extra rows materialized on each side of the visible range
    pub overscan: usize,
}

impl ViewportState {
    pub fn new(row_height: f64, overscan: usize) -> Self {
        Self {
            scroll_offset: 0.0,
            container_height: 0.0,
            row_height,
            overscan,
        }
    }
}
