//! In-memory source executor.

use crate::executor::Executor;
use crate::record::Record;
use anyhow::{bail, Result};
use std::collections::VecDeque;

/// Executor that yields a fixed list of records in order
pub struct ValuesExecutor {
    records: VecDeque<Record>,
    initialized: bool,
}

impl ValuesExecutor {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
            initialized: false,
        }
    }
}

impl Executor for ValuesExecutor {
    fn init(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn next(&mut self) -> Result<Option<Record>> {
        if !self.initialized {
            bail!("Executor not initialized. Call init() first.");
        }

        Ok(self.records.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    #[test]
    fn test_values_in_order() -> Result<()> {
        let records: Vec<Record> = (0..3)
            .map(|i| Record::from([("n".to_string(), Value::Integer(i))]))
            .collect();

        let mut values = ValuesExecutor::new(records.clone());
        values.init()?;

        for expected in &records {
            assert_eq!(values.next()?.as_ref(), Some(expected));
        }
        assert!(values.next()?.is_none());
        assert!(values.next()?.is_none());
        Ok(())
    }

    #[test]
    fn test_values_not_initialized() {
        let mut values = ValuesExecutor::new(vec![Record::new()]);
        assert!(values.next().is_err());
    }
}
