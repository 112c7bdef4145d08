use crate::{Error, Result};
use lazygrid_types::ViewportState;

/// Contiguous index range of rows to materialize: `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: usize,
    pub end: usize,
}

impl WindowBounds {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Map scroll geometry to the row range worth rendering.
///
/// `start` is the first row whose pixel extent could be visible, minus
/// overscan; the window covers the visible row count plus overscan on both
/// sides, clamped to `[0, total_rows]`. Pure function: identical inputs give
/// identical bounds.
pub fn compute_window(viewport: &ViewportState, total_rows: usize) -> Result<WindowBounds> {
    if !viewport.row_height.is_finite() || viewport.row_height <= 0.0 {
        return Err(Error::InvalidRowHeight(viewport.row_height));
    }

    if total_rows == 0 {
        return Ok(WindowBounds { start: 0, end: 0 });
    }

    let scroll_offset = viewport.scroll_offset.max(0.0);
    let container_height = viewport.container_height.max(0.0);

    let first_visible = (scroll_offset / viewport.row_height).floor() as usize;
    let visible_count =
        (container_height / viewport.row_height).ceil() as usize + 2 * viewport.overscan;

    let start = first_visible
        .saturating_sub(viewport.overscan)
        .min(total_rows);
    let end = start.saturating_add(visible_count).min(total_rows);

    Ok(WindowBounds { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_compact_debug_snapshot;

    fn viewport(scroll_offset: f64, container_height: f64, row_height: f64, overscan: usize) -> ViewportState {
        ViewportState {
            scroll_offset,
            container_height,
            row_height,
            overscan,
        }
    }

    #[test]
    fn window_at_top_of_list() {
        let bounds = compute_window(&viewport(0.0, 400.0, 40.0, 2), 1000).unwrap();
        assert_compact_debug_snapshot!(bounds, @"WindowBounds { start: 0, end: 14 }");
    }

    #[test]
    fn window_mid_scroll_applies_overscan_both_sides() {
        // 10 visible rows at offset row 25, overscan 2 on each side
        let bounds = compute_window(&viewport(1000.0, 400.0, 40.0, 2), 1000).unwrap();
        assert_eq!(bounds, WindowBounds { start: 23, end: 37 });
    }

    #[test]
    fn window_clamps_to_total_rows() {
        let bounds = compute_window(&viewport(1000.0, 400.0, 40.0, 2), 30).unwrap();
        assert_eq!(bounds, WindowBounds { start: 23, end: 30 });
    }

    #[test]
    fn window_past_the_end_stays_well_formed() {
        let bounds = compute_window(&viewport(100_000.0, 400.0, 40.0, 2), 30).unwrap();
        assert_eq!(bounds, WindowBounds { start: 30, end: 30 });
    }

    #[test]
    fn empty_list_yields_empty_window() {
        let bounds = compute_window(&viewport(500.0, 400.0, 40.0, 2), 0).unwrap();
        assert_eq!(bounds, WindowBounds { start: 0, end: 0 });
    }

    #[test]
    fn negative_scroll_offset_clamps_to_zero() {
        let bounds = compute_window(&viewport(-250.0, 400.0, 40.0, 1), 100).unwrap();
        assert_eq!(bounds.start, 0);
    }

    #[test]
    fn fractional_heights_round_up_visible_count() {
        // 400 / 48 = 8.33 visible rows -> 9, plus 2 overscan
        let bounds = compute_window(&viewport(0.0, 400.0, 48.0, 1), 100).unwrap();
        assert_eq!(bounds, WindowBounds { start: 0, end: 11 });
    }

    #[test]
    fn non_positive_row_height_fails_fast() {
        assert!(matches!(
            compute_window(&viewport(0.0, 400.0, 0.0, 2), 100),
            Err(Error::InvalidRowHeight(_))
        ));
        assert!(matches!(
            compute_window(&viewport(0.0, 400.0, -12.0, 2), 100),
            Err(Error::InvalidRowHeight(_))
        ));
        assert!(matches!(
            compute_window(&viewport(0.0, 400.0, f64::NAN, 2), 100),
            Err(Error::InvalidRowHeight(_))
        ));
    }

    #[test]
    fn bounds_invariant_over_a_parameter_sweep() {
        for total in [0usize, 1, 7, 100, 5000] {
            for offset in [0.0, 10.0, 333.3, 4_999.0, 1_000_000.0] {
                for height in [1.0, 17.5, 48.0] {
                    for overscan in [0usize, 1, 8] {
                        let bounds =
                            compute_window(&viewport(offset, 600.0, height, overscan), total)
                                .unwrap();
                        assert!(bounds.start <= bounds.end);
                        assert!(bounds.end <= total);
                    }
                }
            }
        }
    }
}
