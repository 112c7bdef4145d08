use lazygrid_types::{FilterSet, Fingerprint};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation token passed into every page fetch.
///
/// Cloning shares the underlying flag. Sources are expected to check the
/// token at their own suspension points; the lifecycle manager additionally
/// checks it after the call returns, so a slow source that ignores the token
/// still cannot deliver a superseded result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One page request as handed to a [`PageSource`]
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub fingerprint: Fingerprint,
    pub filters: FilterSet,
    /// 1-based page index
    pub page: u32,
    pub page_size: usize,
}

/// Successful fetch payload: the rows for one page, in server order
#[derive(Debug, Clone)]
pub struct PageFetch<R> {
    pub records: Vec<R>,
}

impl<R> PageFetch<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }
}

/// Fetch failure taxonomy.
///
/// `Cancelled` is not a user-visible error: it is swallowed by the lifecycle
/// manager and never reaches load state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Request was cancelled cooperatively; silently dropped
    Cancelled,
    /// Transient network or server failure; retryable by caller action
    Network(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Cancelled => write!(f, "Request cancelled"),
            FetchError::Network(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// The external data source contract.
///
/// `fetch_page` runs on a worker thread owned by the lifecycle manager, so a
/// blocking implementation (HTTP client, database query) is fine. Sources
/// must not assume ordering across calls: a response for a superseded filter
/// set is discarded by the caller. Timeouts are the source's responsibility
/// and surface as `FetchError::Network`.
pub trait PageSource<R>: Send + Sync + 'static {
    fn fetch_page(
        &self,
        request: &PageRequest,
        token: &CancelToken,
    ) -> std::result::Result<PageFetch<R>, FetchError>;
}
