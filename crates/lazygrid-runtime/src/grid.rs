use crate::config::GridConfig;
use crate::coordinator::{GridEvent, LoadCoordinator};
use crate::sentinel::Sentinel;
use crate::source::PageSource;
use crate::Result;
use lazygrid_cache::ResultCache;
use lazygrid_engine::{compute_window, sort_records, ColumnSpec, ColumnVisibility};
use lazygrid_types::{FilterSet, GridRecord, LoadState, SortSpec, ViewportState};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Builder for [`Grid`]. Validates configuration before anything starts.
pub struct GridBuilder<R: GridRecord> {
    source: Arc<dyn PageSource<R>>,
    cache: Option<Arc<ResultCache<R>>>,
    config: GridConfig,
    columns: Vec<ColumnSpec>,
}

impl<R: GridRecord> GridBuilder<R> {
    pub fn new(source: Arc<dyn PageSource<R>>, config: GridConfig) -> Self {
        Self {
            source,
            cache: None,
            config,
            columns: Vec::new(),
        }
    }

    /// Share a process-wide cache across grid instances. Without this the
    /// grid gets its own private store.
    pub fn cache(mut self, cache: Arc<ResultCache<R>>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = columns;
        self
    }

    pub fn build(self) -> Result<Grid<R>> {
        self.config.validate()?;

        let cache = self.cache.unwrap_or_else(ResultCache::shared);
        let coordinator = LoadCoordinator::new(
            self.source,
            cache,
            self.config.page_size,
            self.config.ttl(),
        );

        Ok(Grid {
            sentinel: Sentinel::new(self.config.load_threshold),
            viewport: ViewportState::new(self.config.row_height, self.config.overscan),
            sort: SortSpec::unsorted(),
            columns: ColumnVisibility::new(self.columns),
            coordinator,
            config: self.config,
        })
    }
}

/// The row range a render pass should materialize: a sorted, windowed view
/// over the merged row set.
#[derive(Debug, Clone)]
pub struct VisibleRows<R> {
    /// Index of the first materialized row within the sorted set
    pub start: usize,
    /// One past the last materialized row
    pub end: usize,
    pub records: Vec<R>,
    /// Total sorted rows, for scrollbar extent math
    pub total: usize,
}

/// Synchronous facade a rendering layer drives.
///
/// Owns the load coordinator, sort spec, column visibility and viewport
/// geometry for one grid instance. Everything here runs on the caller's
/// thread; fetch completions queue up until [`poll`](Self::poll).
pub struct Grid<R: GridRecord> {
    coordinator: LoadCoordinator<R>,
    sentinel: Sentinel,
    sort: SortSpec,
    columns: ColumnVisibility,
    viewport: ViewportState,
    config: GridConfig,
}

impl<R: GridRecord> Grid<R> {
    pub fn builder(source: Arc<dyn PageSource<R>>, config: GridConfig) -> GridBuilder<R> {
        GridBuilder::new(source, config)
    }

    /// Switch the active filter combination; see
    /// [`LoadCoordinator::apply_filters`]
    pub fn apply_filters(&mut self, filters: FilterSet) -> Result<()> {
        self.sentinel.reset();
        self.coordinator.apply_filters(filters)
    }

    /// Update scroll geometry and run the sentinel probe. Call from every
    /// scroll or resize event; filter bursts should be debounced by the
    /// caller before reaching [`apply_filters`](Self::apply_filters), but
    /// scroll events need no such care.
    pub fn set_viewport(&mut self, scroll_offset: f64, container_height: f64) -> Result<()> {
        self.viewport.scroll_offset = scroll_offset;
        self.viewport.container_height = container_height;
        self.probe_sentinel()
    }

    /// Apply queued fetch completions. Returns true when rows or load state
    /// changed, in which case the caller should re-render. A completed load
    /// may immediately re-arm the sentinel when the viewport still reaches
    /// past the new extent, chaining fetches until the screen is filled.
    pub fn poll(&mut self) -> Result<bool> {
        let changed = self.coordinator.poll();
        if changed {
            self.probe_sentinel()?;
        }
        Ok(changed)
    }

    /// Client-side sort over the loaded rows; no fetch state is touched.
    /// Ignored when sorting is disabled in the configuration.
    pub fn set_sort(&mut self, spec: SortSpec) {
        if !self.config.enable_sorting {
            log::debug!("sorting disabled by configuration; ignoring sort request");
            return;
        }
        self.sort = spec;
    }

    /// Column-header click helper: same key flips direction, new key starts
    /// ascending
    pub fn toggle_sort(&mut self, key: &str) {
        if !self.config.enable_sorting {
            return;
        }
        self.sort = self.sort.toggled(key);
    }

    pub fn sort_spec(&self) -> &SortSpec {
        &self.sort
    }

    pub fn toggle_column(&mut self, column_id: &str) {
        if !self.config.enable_column_visibility {
            log::debug!("column visibility disabled by configuration; ignoring toggle");
            return;
        }
        self.columns.toggle(column_id);
    }

    pub fn visible_columns(&self) -> Vec<&ColumnSpec> {
        self.columns.visible_columns()
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.columns.is_visible(column_id)
    }

    /// Sorted, windowed view for the render pass
    pub fn visible_rows(&self) -> Result<VisibleRows<R>> {
        let rows = self.coordinator.rows();
        let sorted = if self.config.enable_sorting {
            sort_records(rows, &self.sort)
        } else {
            rows.to_vec()
        };

        let bounds = compute_window(&self.viewport, sorted.len()).map_err(crate::Error::Engine)?;
        let records = sorted[bounds.start..bounds.end].to_vec();
        Ok(VisibleRows {
            start: bounds.start,
            end: bounds.end,
            records,
            total: sorted.len(),
        })
    }

    /// Default cell renderer: the display form of the record value behind
    /// the column's accessor.
    pub fn cell_text(&self, column: &ColumnSpec, record: &R) -> String {
        record.sort_value(&column.accessor).display()
    }

    /// Merged row set in arrival order, unsorted and unwindowed
    pub fn rows(&self) -> &[R] {
        self.coordinator.rows()
    }

    pub fn state(&self) -> &LoadState {
        self.coordinator.state()
    }

    pub fn events(&self) -> &Receiver<GridEvent> {
        self.coordinator.events()
    }

    /// Re-request the failed page after a fetch error
    pub fn retry(&mut self) -> Result<()> {
        self.coordinator.retry()
    }

    /// Invalidate the current fingerprint's cache entry and reload from
    /// page 1
    pub fn refresh(&mut self) -> Result<()> {
        self.sentinel.reset();
        self.coordinator.refresh()
    }

    /// Mutation notification hook: call after any record create/update/
    /// delete so no grid serves stale post-write data. The caller decides
    /// when to [`refresh`](Self::refresh).
    pub fn record_mutated(&self) {
        self.coordinator.invalidate_after_mutation();
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    fn probe_sentinel(&mut self) -> Result<()> {
        let fired = self.sentinel.observe(
            &self.viewport,
            self.coordinator.rows().len(),
            self.coordinator.state().status,
        );
        if fired {
            self.coordinator.load_more()?;
        }
        Ok(())
    }
}
