//! Sort executor implementation.
//!
//! This executor sorts records from a child executor based on one or more
//! sort criteria. It materializes all records from the child executor into
//! memory before sorting, then returns them in the sorted order.
//!
//! Supports:
//! - Multi-field sorting (most significant criterion first)
//! - Missing fields (first for ASC, last for DESC)
//! - ASC/DESC ordering per field
//!
//! The sort is stable, so records that compare equal keep their input order.

use crate::executor::Executor;
use crate::expression::sort_order;
use crate::record::{Record, Value};
use anyhow::{bail, Result};
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Sort order for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort criteria for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriteria {
    /// Field name to sort by
    pub field: String,
    /// Sort order (ASC/DESC)
    pub order: SortOrder,
}

impl SortCriteria {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// Compare two records on this criterion
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let cmp = compare_fields(a.get(&self.field), b.get(&self.field));
        match self.order {
            SortOrder::Asc => cmp,
            SortOrder::Desc => cmp.reverse(),
        }
    }
}

/// Ascending comparison of two optional field values, absent first
fn compare_fields(v1: Option<&Value>, v2: Option<&Value>) -> Ordering {
    match (v1, v2) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(v1), Some(v2)) => sort_order(v1, v2),
    }
}

/// Executor that sorts records based on multiple criteria
pub struct SortExecutor {
    /// Child executor that produces records
    child: Box<dyn Executor>,
    /// Sort criteria (in order of precedence)
    criteria: Vec<SortCriteria>,
    /// Materialized and sorted records
    sorted_records: VecDeque<Record>,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl SortExecutor {
    /// Create a new sort executor
    ///
    /// # Arguments
    /// * `child` - The child executor that produces records
    /// * `criteria` - Sort criteria in order of precedence
    pub fn new(child: Box<dyn Executor>, criteria: Vec<SortCriteria>) -> Self {
        Self {
            child,
            criteria,
            sorted_records: VecDeque::new(),
            initialized: false,
        }
    }
}

impl Executor for SortExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        // Initialize child executor
        self.child.init()?;

        // Materialize all records from child
        let mut records = Vec::new();
        while let Some(record) = self.child.next()? {
            records.push(record);
        }

        // `sort_by` is stable
        let criteria = &self.criteria;
        records.sort_by(|a, b| {
            criteria
                .iter()
                .map(|c| c.compare(a, b))
                .find(|cmp| *cmp != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        log::debug!(
            "sorted {} records by {} criteria",
            records.len(),
            self.criteria.len()
        );
        self.sorted_records = records.into();

        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        Ok(self.sorted_records.pop_front())
    }
}
