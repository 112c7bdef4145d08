use lazygrid_types::{LoadStatus, ViewportState};

/// Rows between the anchor and the physical end of the loaded set, giving
/// the network round-trip a head start before the user hits the bottom.
const DEFAULT_LEAD_ROWS: usize = 3;

/// Boundary probe that signals proximity to the end of the loaded rows.
///
/// Decouples fetch triggering from scroll-position math: the probe watches an
/// anchor row placed a few rows before the end (never the literal last row)
/// and fires once when that anchor enters the observation region, a
/// configurable pixel margin before the viewport edge. Any scroll event
/// source can drive it; it is a plain geometry check.
///
/// The probe is inert while the grid is already loading more, exhausted or in
/// an error state, and it will not fire twice for the same loaded extent.
#[derive(Debug)]
pub struct Sentinel {
    threshold_px: f64,
    lead_rows: usize,
    last_fired_extent: Option<usize>,
}

impl Sentinel {
    pub fn new(threshold_px: f64) -> Self {
        Self::with_lead_rows(threshold_px, DEFAULT_LEAD_ROWS)
    }

    pub fn with_lead_rows(threshold_px: f64, lead_rows: usize) -> Self {
        Self {
            threshold_px: threshold_px.max(0.0),
            lead_rows: lead_rows.max(1),
            last_fired_extent: None,
        }
    }

    /// Run the geometry check. Returns true exactly once per loaded extent
    /// when the anchor row is inside the observation region and the status
    /// permits loading more.
    pub fn observe(
        &mut self,
        viewport: &ViewportState,
        total_rows: usize,
        status: LoadStatus,
    ) -> bool {
        if !status.can_load_more() || total_rows == 0 {
            return false;
        }
        if self.last_fired_extent == Some(total_rows) {
            return false;
        }
        if viewport.row_height <= 0.0 {
            return false;
        }

        let anchor_index = total_rows.saturating_sub(1 + self.lead_rows);
        let anchor_bottom = (anchor_index + 1) as f64 * viewport.row_height;
        let observed_bottom =
            viewport.scroll_offset.max(0.0) + viewport.container_height + self.threshold_px;

        if anchor_bottom <= observed_bottom {
            self.last_fired_extent = Some(total_rows);
            return true;
        }
        false
    }

    /// Forget fire history, e.g. after a filter change replaced the row set
    pub fn reset(&mut self) {
        self.last_fired_extent = None;
    }
}
