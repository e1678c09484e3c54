//! Executor layer for query execution.
//!
//! This module implements the Volcano-style iterator model over records.
//! Each executor produces records one at a time via the `next()` method,
//! so a query pipeline is built by wrapping executors around a source.

use crate::record::Record;
use anyhow::Result;

pub mod filter;
pub mod limit;
pub mod sort;
pub mod time;
pub mod values;

// Re-export executors
pub use filter::FilterExecutor;
pub use limit::{LimitExecutor, Pagination, PaginationMetadata};
pub use sort::{SortCriteria, SortExecutor, SortOrder};
pub use time::{parse_duration, DurationError, TimeFilter, DEFAULT_TIME_FIELD};
pub use values::ValuesExecutor;

/// Trait for all query executors
pub trait Executor: Send {
    /// Initialize the executor. This must be called before `next()`.
    fn init(&mut self) -> Result<()>;

    /// Get the next record from the executor.
    /// Returns None when there are no more records.
    fn next(&mut self) -> Result<Option<Record>>;
}

/// Initialize an executor and drain every record it produces
pub fn collect(executor: &mut dyn Executor) -> Result<Vec<Record>> {
    executor.init()?;

    let mut records = Vec::new();
    while let Some(record) = executor.next()? {
        records.push(record);
    }
    Ok(records)
}
