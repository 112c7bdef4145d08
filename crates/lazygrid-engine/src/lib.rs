// Engine module - pure synchronous compute over loaded rows
// No I/O, no clocks: everything here is deterministic given its inputs

pub mod columns;
mod error;
pub mod sort;
pub mod window;

pub use columns::{ColumnSpec, ColumnVisibility};
pub use error::{Error, Result};
pub use sort::sort_records;
pub use window::{compute_window, WindowBounds};
