//! Load orchestration for the lazygrid data grid.
//!
//! This crate ties the pure compute layer (`lazygrid-engine`) and the shared
//! result cache (`lazygrid-cache`) to a remote page source. The moving parts:
//!
//! - [`PageSource`]: the data source contract, executed with cooperative
//!   cancellation on a worker thread
//! - [`RequestLifecycle`]: at most one in-flight request per grid instance,
//!   superseded requests cancelled and their late responses discarded
//! - [`LoadCoordinator`]: the state machine deciding when to fetch page 1
//!   (filter change) and when to fetch the next page (sentinel proximity)
//! - [`Sentinel`]: the boundary probe that converts scroll geometry into
//!   "near the end" signals
//! - [`Grid`]: the facade a rendering layer drives
//!
//! All state mutation happens on the caller's thread: fetch completions are
//! queued on a channel and applied during [`Grid::poll`].

pub mod config;
pub mod coordinator;
mod error;
pub mod fetch;
pub mod grid;
pub mod sentinel;
pub mod source;

pub use config::GridConfig;
pub use coordinator::{GridEvent, LoadCoordinator};
pub use error::{Error, Result};
pub use fetch::{FetchCompletion, RequestLifecycle};
pub use grid::{Grid, GridBuilder, VisibleRows};
pub use sentinel::Sentinel;
pub use source::{CancelToken, FetchError, PageFetch, PageRequest, PageSource};
