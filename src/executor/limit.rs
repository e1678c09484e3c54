//! Limit executor implementation.
//!
//! This executor limits the number of records returned from a child
//! executor. It supports both LIMIT and OFFSET for pagination; a limit of
//! zero means no limit.

use crate::executor::Executor;
use crate::record::Record;
use anyhow::{bail, Result};
use serde::Serialize;

/// Pagination parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of records, 0 for no limit
    pub limit: usize,
    /// Number of records to skip
    pub offset: usize,
}

impl Pagination {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Describe the page taken out of `total_records` records
    pub fn metadata(&self, total_records: usize) -> PaginationMetadata {
        let mut returned = total_records.saturating_sub(self.offset);
        if self.limit > 0 {
            returned = returned.min(self.limit);
        }

        PaginationMetadata {
            total_records,
            returned_records: returned,
            offset: self.offset,
            limit: self.limit,
            has_more: self.limit > 0 && self.offset.saturating_add(self.limit) < total_records,
        }
    }
}

/// Pagination summary reported alongside query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMetadata {
    pub total_records: usize,
    pub returned_records: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// Executor that limits the number of records returned
pub struct LimitExecutor {
    /// Child executor that produces records
    child: Box<dyn Executor>,
    /// Maximum number of records to return, 0 for no limit
    limit: usize,
    /// Number of records to skip before returning
    offset: usize,
    /// Number of records skipped so far
    skipped: usize,
    /// Number of records returned so far
    returned: usize,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl LimitExecutor {
    /// Create a new limit executor with only limit
    ///
    /// # Arguments
    /// * `child` - The child executor that produces records
    /// * `limit` - The maximum number of records to return
    pub fn new(child: Box<dyn Executor>, limit: usize) -> Self {
        Self::with_offset(child, limit, 0)
    }

    /// Create a new limit executor with limit and offset
    ///
    /// # Arguments
    /// * `child` - The child executor that produces records
    /// * `limit` - The maximum number of records to return
    /// * `offset` - The number of records to skip before returning
    pub fn with_offset(child: Box<dyn Executor>, limit: usize, offset: usize) -> Self {
        Self {
            child,
            limit,
            offset,
            skipped: 0,
            returned: 0,
            initialized: false,
        }
    }

    pub fn from_pagination(child: Box<dyn Executor>, pagination: Pagination) -> Self {
        Self::with_offset(child, pagination.limit, pagination.offset)
    }
}

impl Executor for LimitExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        // Initialize child executor
        self.child.init()?;

        // Reset counters
        self.skipped = 0;
        self.returned = 0;

        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        // If we've already returned the limit number of records, we're done
        if self.limit > 0 && self.returned >= self.limit {
            return Ok(None);
        }

        // Skip offset number of records if we haven't already
        while self.skipped < self.offset {
            match self.child.next()? {
                Some(_) => self.skipped += 1,
                None => return Ok(None),
            }
        }

        match self.child.next()? {
            Some(record) => {
                self.returned += 1;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{collect, ValuesExecutor};
    use crate::record::Value;

    fn numbered(count: i64) -> Box<dyn Executor> {
        let records = (0..count)
            .map(|n| Record::from([("n".to_string(), Value::Integer(n))]))
            .collect();
        Box::new(ValuesExecutor::new(records))
    }

    fn numbers(records: &[Record]) -> Vec<Value> {
        records.iter().map(|r| r["n"].clone()).collect()
    }

    #[test]
    fn test_limit_basic() -> Result<()> {
        let mut limit = LimitExecutor::new(numbered(10), 3);
        let records = collect(&mut limit)?;
        assert_eq!(
            numbers(&records),
            vec![Value::Integer(0), Value::Integer(1), Value::Integer(2)]
        );
        Ok(())
    }

    #[test]
    fn test_limit_with_offset() -> Result<()> {
        let mut limit = LimitExecutor::with_offset(numbered(10), 2, 7);
        let records = collect(&mut limit)?;
        assert_eq!(numbers(&records), vec![Value::Integer(7), Value::Integer(8)]);
        Ok(())
    }

    #[test]
    fn test_limit_zero_is_unlimited() -> Result<()> {
        let mut limit = LimitExecutor::with_offset(numbered(10), 0, 4);
        assert_eq!(collect(&mut limit)?.len(), 6);
        Ok(())
    }

    #[test]
    fn test_offset_beyond_end() -> Result<()> {
        let mut limit = LimitExecutor::with_offset(numbered(5), 10, 12);
        assert!(collect(&mut limit)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_limit_not_initialized() {
        let mut limit = LimitExecutor::new(numbered(1), 1);
        assert!(limit.next().is_err());
    }

    #[test]
    fn test_pagination_metadata() {
        assert_eq!(
            Pagination::new(50, 0).metadata(100),
            PaginationMetadata {
                total_records: 100,
                returned_records: 50,
                offset: 0,
                limit: 50,
                has_more: true,
            }
        );

        let last_page = Pagination::new(50, 90).metadata(100);
        assert_eq!(last_page.returned_records, 10);
        assert!(!last_page.has_more);

        let unlimited = Pagination::new(0, 0).metadata(100);
        assert_eq!(unlimited.returned_records, 100);
        assert!(!unlimited.has_more);

        let beyond = Pagination::new(10, 150).metadata(100);
        assert_eq!(beyond.returned_records, 0);
        assert!(!beyond.has_more);
    }

    #[test]
    fn test_pagination_metadata_huge_limit() {
        let metadata = Pagination::new(usize::MAX, 1).metadata(3);
        assert_eq!(metadata.returned_records, 2);
        assert!(!metadata.has_more);

        let metadata = Pagination::new(1, usize::MAX).metadata(3);
        assert_eq!(metadata.returned_records, 0);
        assert!(!metadata.has_more);
    }

    #[test]
    fn test_limit_huge_values() -> Result<()> {
        let mut limit = LimitExecutor::with_offset(numbered(3), usize::MAX, 1);
        assert_eq!(collect(&mut limit)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_pagination_metadata_json() {
        let json = serde_json::to_value(Pagination::new(10, 0).metadata(25)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total_records": 25,
                "returned_records": 10,
                "offset": 0,
                "limit": 10,
                "has_more": true
            })
        );
    }
}
