//! Filter executor implementation.
//!
//! This executor filters records from a child executor based on an
//! expression. It implements the volcano-style iterator model, producing one
//! record at a time that matches the expression.

use crate::executor::Executor;
use crate::expression::{Expression, ExpressionEvaluator};
use crate::record::Record;
use anyhow::{bail, Result};

/// Executor that filters records based on an expression
pub struct FilterExecutor {
    /// Child executor that produces records
    child: Box<dyn Executor>,
    /// Filter expression
    filter_expr: Expression,
    /// Records seen and kept, for logging
    scanned: usize,
    matched: usize,
    /// Whether the executor has been initialized
    initialized: bool,
}

impl FilterExecutor {
    /// Create a new filter executor
    ///
    /// # Arguments
    /// * `child` - The child executor that produces records
    /// * `filter_expr` - The filter expression
    pub fn new(child: Box<dyn Executor>, filter_expr: Expression) -> Self {
        Self {
            child,
            filter_expr,
            scanned: 0,
            matched: 0,
            initialized: false,
        }
    }
}

impl Executor for FilterExecutor {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        // Initialize child executor
        self.child.init()?;

        self.scanned = 0;
        self.matched = 0;
        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        // Keep pulling records from the child until one matches
        while let Some(record) = self.child.next()? {
            self.scanned += 1;

            // Evaluation errors abort the whole query
            if ExpressionEvaluator::new(&record).evaluate(&self.filter_expr)? {
                self.matched += 1;
                return Ok(Some(record));
            }
        }

        log::debug!(
            "filter {} kept {} of {} records",
            self.filter_expr,
            self.matched,
            self.scanned
        );
        Ok(None)
    }
}
