pub mod filter;
pub mod record;
pub mod sort;
pub mod state;

pub use filter::{FilterSet, Fingerprint};
pub use record::{GridRecord, Page, RecordId, SortValue};
pub use sort::{SortDirection, SortSpec};
pub use state::{LoadState, LoadStatus, ViewportState};
