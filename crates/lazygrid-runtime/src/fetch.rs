use crate::source::{CancelToken, FetchError, PageFetch, PageRequest, PageSource};
use crate::Result;
use lazygrid_types::Fingerprint;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use uuid::Uuid;

/// Completed fetch as delivered over the lifecycle channel
#[derive(Debug)]
pub struct FetchCompletion<R> {
    pub request_id: Uuid,
    pub fingerprint: Fingerprint,
    /// 1-based page index that was requested
    pub page: u32,
    pub result: std::result::Result<PageFetch<R>, FetchError>,
}

struct InFlight {
    request_id: Uuid,
    fingerprint: Fingerprint,
    token: CancelToken,
}

/// Issues cancellable fetches against a [`PageSource`], guaranteeing at most
/// one outstanding request per grid instance.
///
/// Dispatching a new request cancels whatever is still in flight, so a slow
/// first-page response can never overwrite a newer filter's results. A
/// cancelled worker drops its result before it reaches the channel, and
/// `try_recv` additionally discards any completion whose request id is no
/// longer current; the coordinator applies a third, fingerprint-level check.
pub struct RequestLifecycle<R> {
    source: Arc<dyn PageSource<R>>,
    tx: Sender<FetchCompletion<R>>,
    rx: Receiver<FetchCompletion<R>>,
    in_flight: Option<InFlight>,
}

impl<R: Send + 'static> RequestLifecycle<R> {
    pub fn new(source: Arc<dyn PageSource<R>>) -> Self {
        let (tx, rx) = channel();
        Self {
            source,
            tx,
            rx,
            in_flight: None,
        }
    }

    /// Start fetching a page on a worker thread, superseding any outstanding
    /// request. Returns the request id used to match the completion.
    pub fn dispatch(&mut self, request: PageRequest) -> Result<Uuid> {
        self.cancel_in_flight();

        let request_id = Uuid::new_v4();
        let token = CancelToken::new();
        self.in_flight = Some(InFlight {
            request_id,
            fingerprint: request.fingerprint.clone(),
            token: token.clone(),
        });

        let source = self.source.clone();
        let tx = self.tx.clone();
        std::thread::Builder::new()
            .name("lazygrid-fetch".to_string())
            .spawn(move || {
                let result = source.fetch_page(&request, &token);

                // A cancelled request never reports back, whichever side
                // noticed the cancellation first
                if token.is_cancelled() || matches!(result, Err(FetchError::Cancelled)) {
                    log::debug!(
                        "fetch for fingerprint {} page {} cancelled; result dropped",
                        request.fingerprint,
                        request.page
                    );
                    return;
                }

                let _ = tx.send(FetchCompletion {
                    request_id,
                    fingerprint: request.fingerprint,
                    page: request.page,
                    result,
                });
            })?;

        Ok(request_id)
    }

    /// Cancel the outstanding request, if any. Safe to call when idle.
    pub fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            log::debug!(
                "cancelling in-flight request {} for fingerprint {}",
                in_flight.request_id,
                in_flight.fingerprint
            );
            in_flight.token.cancel();
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Drain the next completion belonging to the current request, dropping
    /// any stale completions that slipped into the channel before their
    /// cancellation took effect. Non-blocking.
    pub fn try_recv(&mut self) -> Option<FetchCompletion<R>> {
        loop {
            match self.rx.try_recv() {
                Ok(completion) => {
                    let current = self
                        .in_flight
                        .as_ref()
                        .map(|in_flight| in_flight.request_id == completion.request_id)
                        .unwrap_or(false);
                    if current {
                        self.in_flight = None;
                        return Some(completion);
                    }
                    log::debug!(
                        "discarding superseded completion {} for fingerprint {}",
                        completion.request_id,
                        completion.fingerprint
                    );
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }
}
