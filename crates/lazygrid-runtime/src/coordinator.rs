use crate::fetch::RequestLifecycle;
use crate::source::{FetchError, PageRequest, PageSource};
use crate::Result;
use chrono::Duration;
use lazygrid_cache::ResultCache;
use lazygrid_types::{FilterSet, Fingerprint, GridRecord, LoadState, LoadStatus, Page, RecordId};
use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Notifications emitted by the coordinator so a rendering layer can react
/// without polling every field.
#[derive(Debug, Clone)]
pub enum GridEvent {
    /// Load state transitioned
    StateChanged(LoadState),
    /// New rows were appended to the merged set
    RowsAppended { count: usize },
    /// The merged set was cleared (filter change or refresh)
    Reset,
    /// A fetch failed; previously loaded rows are preserved
    FetchFailed { message: String },
}

/// Orchestrates the result cache and the request lifecycle for one grid
/// instance.
///
/// The coordinator exclusively owns the merged row set and the load state.
/// It decides when to fetch page 1 (filter change), when to fetch the next
/// page (proximity signal), and guarantees the merged set is append-only
/// within a fingerprint's lifetime, deduplicated by record identity, and
/// immune to late responses from superseded filters (last-filter-wins).
pub struct LoadCoordinator<R: GridRecord> {
    cache: Arc<ResultCache<R>>,
    lifecycle: RequestLifecycle<R>,
    page_size: usize,
    ttl: Duration,
    filters: FilterSet,
    fingerprint: Fingerprint,
    state: LoadState,
    rows: Vec<R>,
    seen: HashSet<RecordId>,
    retry_page: u32,
    events_tx: Sender<GridEvent>,
    events_rx: Receiver<GridEvent>,
}

impl<R: GridRecord> LoadCoordinator<R> {
    pub fn new(
        source: Arc<dyn PageSource<R>>,
        cache: Arc<ResultCache<R>>,
        page_size: usize,
        ttl: Duration,
    ) -> Self {
        let (events_tx, events_rx) = channel();
        let filters = FilterSet::new();
        let fingerprint = filters.fingerprint();
        Self {
            cache,
            lifecycle: RequestLifecycle::new(source),
            page_size,
            ttl,
            filters,
            fingerprint,
            state: LoadState::idle(),
            rows: Vec::new(),
            seen: HashSet::new(),
            retry_page: 1,
            events_tx,
            events_rx,
        }
    }

    /// Merged, deduplicated row set in arrival order
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    /// Receiver for [`GridEvent`] notifications
    pub fn events(&self) -> &Receiver<GridEvent> {
        &self.events_rx
    }

    /// Switch to a new filter combination.
    ///
    /// Cancels any in-flight request for the old fingerprint, clears the
    /// merged set and consults the cache before going to the network: a live
    /// cached entry restores its rows and pagination position without a
    /// fetch. Re-applying the current fingerprint is a no-op unless the grid
    /// has never loaded.
    pub fn apply_filters(&mut self, filters: FilterSet) -> Result<()> {
        let fingerprint = filters.fingerprint();
        if fingerprint == self.fingerprint && self.state.status != LoadStatus::Idle {
            return Ok(());
        }

        self.lifecycle.cancel_in_flight();
        self.filters = filters;
        self.fingerprint = fingerprint;
        self.rows.clear();
        self.seen.clear();
        self.retry_page = 1;
        self.emit(GridEvent::Reset);

        if let Some(entry) = self.cache.get(&self.fingerprint) {
            log::debug!(
                "cache hit for fingerprint {} ({} rows)",
                self.fingerprint,
                entry.records.len()
            );
            let count = entry.records.len();
            for record in entry.records {
                self.append_row(record);
            }
            self.state = LoadState {
                status: if entry.has_more {
                    LoadStatus::HasMore
                } else {
                    LoadStatus::Exhausted
                },
                current_page: entry.pages_loaded.max(1),
                error: None,
            };
            self.emit(GridEvent::RowsAppended { count });
            self.emit(GridEvent::StateChanged(self.state.clone()));
            return Ok(());
        }

        self.state = LoadState {
            status: LoadStatus::LoadingInitial,
            current_page: 1,
            error: None,
        };
        self.dispatch(1)?;
        self.emit(GridEvent::StateChanged(self.state.clone()));
        Ok(())
    }

    /// Proximity signal from the sentinel: fetch the next page.
    ///
    /// Ignored unless the grid is in `HasMore`, which also makes a second
    /// signal during `LoadingMore` harmless.
    pub fn load_more(&mut self) -> Result<()> {
        if !self.state.status.can_load_more() {
            return Ok(());
        }

        self.state.status = LoadStatus::LoadingMore;
        self.dispatch(self.state.current_page + 1)?;
        self.emit(GridEvent::StateChanged(self.state.clone()));
        Ok(())
    }

    /// Apply any completed fetches. Returns true if state or rows changed.
    ///
    /// Responses are applied in fingerprint-matching order only: a completion
    /// whose fingerprint differs from the current one is discarded
    /// unconditionally.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(completion) = self.lifecycle.try_recv() {
            if completion.fingerprint != self.fingerprint {
                log::debug!(
                    "discarding response for superseded fingerprint {}",
                    completion.fingerprint
                );
                continue;
            }

            match completion.result {
                Ok(fetch) => {
                    self.apply_page(completion.page, fetch.records);
                    changed = true;
                }
                Err(FetchError::Cancelled) => {
                    // Not an error; nothing to surface
                }
                Err(FetchError::Network(message)) => {
                    self.retry_page = completion.page;
                    self.state.status = LoadStatus::Error;
                    self.state.error = Some(message.clone());
                    self.emit(GridEvent::FetchFailed { message });
                    self.emit(GridEvent::StateChanged(self.state.clone()));
                    changed = true;
                }
            }
        }
        changed
    }

    /// Re-request the page whose fetch failed. Valid only in `Error`;
    /// previously loaded rows stay in place either way.
    pub fn retry(&mut self) -> Result<()> {
        if self.state.status != LoadStatus::Error {
            return Ok(());
        }

        let page = self.retry_page.max(1);
        self.state.status = if self.rows.is_empty() {
            LoadStatus::LoadingInitial
        } else {
            LoadStatus::LoadingMore
        };
        self.state.error = None;
        self.dispatch(page)?;
        self.emit(GridEvent::StateChanged(self.state.clone()));
        Ok(())
    }

    /// Drop the cache entry for the current fingerprint and reload page 1
    /// from the source. This is the explicit re-arm out of `Exhausted`.
    pub fn refresh(&mut self) -> Result<()> {
        self.lifecycle.cancel_in_flight();
        self.cache.invalidate(&self.fingerprint);
        self.rows.clear();
        self.seen.clear();
        self.retry_page = 1;
        self.state = LoadState {
            status: LoadStatus::LoadingInitial,
            current_page: 1,
            error: None,
        };
        self.emit(GridEvent::Reset);
        self.dispatch(1)?;
        self.emit(GridEvent::StateChanged(self.state.clone()));
        Ok(())
    }

    /// Mutation notification hook: a record was created, updated or deleted
    /// somewhere in the application, so no cached snapshot can be trusted.
    pub fn invalidate_after_mutation(&self) {
        self.cache.invalidate_all();
    }

    fn dispatch(&mut self, page: u32) -> Result<()> {
        let request = PageRequest {
            fingerprint: self.fingerprint.clone(),
            filters: self.filters.clone(),
            page,
            page_size: self.page_size,
        };
        self.lifecycle.dispatch(request)?;
        Ok(())
    }

    fn apply_page(&mut self, page: u32, records: Vec<R>) {
        // A short page means the source ran out. An exactly-full final page
        // reads as has_more and costs one extra empty round-trip before
        // settling into Exhausted; that boundary quirk is intentional.
        let has_more = records.len() == self.page_size;

        self.cache.put(
            &self.fingerprint,
            &Page::new(page, self.page_size, records.clone()),
            has_more,
            self.ttl,
        );

        let mut appended = 0;
        for record in records {
            if self.append_row(record) {
                appended += 1;
            }
        }

        self.state = LoadState {
            status: if has_more {
                LoadStatus::HasMore
            } else {
                LoadStatus::Exhausted
            },
            current_page: page,
            error: None,
        };

        if appended > 0 {
            self.emit(GridEvent::RowsAppended { count: appended });
        }
        self.emit(GridEvent::StateChanged(self.state.clone()));
    }

    fn append_row(&mut self, record: R) -> bool {
        let id = record.record_id();
        if !self.seen.insert(id.clone()) {
            log::warn!("duplicate record identity {} dropped from merged set", id);
            return false;
        }
        self.rows.push(record);
        true
    }

    fn emit(&self, event: GridEvent) {
        let _ = self.events_tx.send(event);
    }
}
