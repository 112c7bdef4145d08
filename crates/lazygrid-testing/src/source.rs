use crate::records::SampleRecord;
use lazygrid_runtime::{CancelToken, FetchError, PageFetch, PageRequest, PageSource};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Immediate in-memory page source over a fixed dataset.
///
/// Supports the two filters the fixture records expose: `status` (equality)
/// and `q` (case-insensitive substring of the name). One-shot failures can be
/// injected to exercise the error path.
pub struct FixtureSource {
    records: Vec<SampleRecord>,
    fail_next: Mutex<Option<String>>,
}

impl FixtureSource {
    pub fn new(records: Vec<SampleRecord>) -> Arc<Self> {
        Arc::new(Self {
            records,
            fail_next: Mutex::new(None),
        })
    }

    /// Make the next fetch fail with a network error
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    fn matches(&self, record: &SampleRecord, request: &PageRequest) -> bool {
        if let Some(status) = request.filters.get("status").and_then(|v| v.as_str()) {
            if record.status != status {
                return false;
            }
        }
        if let Some(q) = request.filters.get("q").and_then(|v| v.as_str()) {
            if !record.name.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

impl PageSource<SampleRecord> for FixtureSource {
    fn fetch_page(
        &self,
        request: &PageRequest,
        token: &CancelToken,
    ) -> Result<PageFetch<SampleRecord>, FetchError> {
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        if let Some(message) = self.fail_next.lock().unwrap().take() {
            return Err(FetchError::Network(message));
        }

        let offset = (request.page.saturating_sub(1) as usize) * request.page_size;
        let records: Vec<SampleRecord> = self
            .records
            .iter()
            .filter(|record| self.matches(record, request))
            .skip(offset)
            .take(request.page_size)
            .cloned()
            .collect();
        Ok(PageFetch::new(records))
    }
}

/// One blocked fetch waiting for the test to script its outcome
pub struct PendingFetch {
    pub request: PageRequest,
    reply: Sender<Result<PageFetch<SampleRecord>, FetchError>>,
}

impl PendingFetch {
    pub fn respond(self, records: Vec<SampleRecord>) {
        let _ = self.reply.send(Ok(PageFetch::new(records)));
    }

    pub fn fail(self, message: &str) {
        let _ = self.reply.send(Err(FetchError::Network(message.to_string())));
    }
}

/// Page source whose responses are released manually.
///
/// Every `fetch_page` call registers a [`PendingFetch`] and blocks its worker
/// thread until the test responds (or drops the pending handle, which
/// surfaces as a network error). This makes supersession and cancellation
/// timing fully deterministic.
#[derive(Default)]
pub struct ManualSource {
    pending: Mutex<VecDeque<PendingFetch>>,
    arrived: Condvar,
}

impl ManualSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wait for the next fetch to arrive, up to `timeout`
    pub fn next_request(&self, timeout: Duration) -> Option<PendingFetch> {
        let mut pending = self.pending.lock().unwrap();
        let deadline = std::time::Instant::now() + timeout;
        loop {
            if let Some(fetch) = pending.pop_front() {
                return Some(fetch);
            }
            let remaining = deadline.checked_duration_since(std::time::Instant::now())?;
            let (guard, result) = self.arrived.wait_timeout(pending, remaining).unwrap();
            pending = guard;
            if result.timed_out() && pending.is_empty() {
                return None;
            }
        }
    }

    /// Number of fetches currently blocked
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl PageSource<SampleRecord> for ManualSource {
    fn fetch_page(
        &self,
        request: &PageRequest,
        token: &CancelToken,
    ) -> Result<PageFetch<SampleRecord>, FetchError> {
        let (reply_tx, reply_rx) = channel();
        {
            let mut pending = self.pending.lock().unwrap();
            pending.push_back(PendingFetch {
                request: request.clone(),
                reply: reply_tx,
            });
        }
        self.arrived.notify_all();

        let result = reply_rx
            .recv()
            .unwrap_or_else(|_| Err(FetchError::Network("manual source dropped reply".into())));
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        result
    }
}
