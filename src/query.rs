//! Query facade.
//!
//! A [`Query`] is parsed once from a `--where`/`--filter` string and then
//! applied to every record of the working set. [`run_query`] builds the full
//! pipeline on top of the executors: time window, filter, sort, paginate.

use crate::executor::{
    collect, DurationError, Executor, FilterExecutor, LimitExecutor, Pagination,
    PaginationMetadata, SortCriteria, SortExecutor, SortOrder, TimeFilter, ValuesExecutor,
};
use crate::expression::{Expression, ExpressionError, ExpressionResult};
use crate::record::Record;
use crate::sql::{self, ParseError};
use chrono::Utc;
use std::fmt;
use thiserror::Error;

/// Errors surfaced to the command running a query
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid filter: {0}")]
    Parse(#[from] ParseError),

    #[error("filter evaluation error: {0}")]
    Evaluation(#[from] ExpressionError),

    #[error("invalid time window: {0}")]
    TimeWindow(#[from] DurationError),

    #[error(transparent)]
    Execution(anyhow::Error),
}

impl From<anyhow::Error> for FilterError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ExpressionError>() {
            Ok(err) => FilterError::Evaluation(err),
            Err(err) => FilterError::Execution(err),
        }
    }
}

/// A parsed filter expression
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    expression: Expression,
}

impl Query {
    /// Parse a filter expression
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Ok(Self {
            expression: sql::parse(input)?,
        })
    }

    pub fn into_expression(self) -> Expression {
        self.expression
    }

    /// Test a single record
    pub fn matches(&self, record: &Record) -> ExpressionResult<bool> {
        self.expression.evaluate(record)
    }

    /// Keep the records that match, in order.
    ///
    /// The first evaluation error aborts the whole pass.
    pub fn apply(&self, records: Vec<Record>) -> ExpressionResult<Vec<Record>> {
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if self.matches(&record)? {
                kept.push(record);
            }
        }
        Ok(kept)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expression.fmt(f)
    }
}

/// Options controlling a query run
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Time window applied before the filter expression
    pub time: TimeFilter,
    /// Filter expression; no filter keeps every record
    pub filter: Option<String>,
    /// Fields to sort by, most significant first
    pub sort_by: Vec<String>,
    /// Sort descending instead of ascending
    pub reverse: bool,
    /// Maximum number of records, 0 for no limit
    pub limit: usize,
    /// Number of records to skip
    pub offset: usize,
}

impl QueryOptions {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.limit, self.offset)
    }

    fn sort_criteria(&self) -> Vec<SortCriteria> {
        let order = if self.reverse {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        self.sort_by
            .iter()
            .map(|field| SortCriteria::new(field.as_str(), order))
            .collect()
    }
}

/// Result of a query run
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub records: Vec<Record>,
    pub pagination: PaginationMetadata,
}

/// Window, filter, sort and paginate `records`.
///
/// The filter is parsed before any record is touched, so a malformed
/// expression never produces partial output. `pagination.total_records`
/// counts the records left after the time window and the filter.
pub fn run_query(records: Vec<Record>, options: &QueryOptions) -> Result<QueryOutput, FilterError> {
    let query = options.filter.as_deref().map(Query::parse).transpose()?;
    let input_count = records.len();
    let records = options.time.apply(records, Utc::now())?;

    let mut executor: Box<dyn Executor> = Box::new(ValuesExecutor::new(records));
    if let Some(query) = query {
        executor = Box::new(FilterExecutor::new(executor, query.into_expression()));
    }
    if !options.sort_by.is_empty() {
        executor = Box::new(SortExecutor::new(executor, options.sort_criteria()));
    }

    let matched = collect(executor.as_mut())?;
    let pagination = options.pagination();
    let metadata = pagination.metadata(matched.len());
    log::debug!(
        "query matched {} of {} records, returning {}",
        matched.len(),
        input_count,
        metadata.returned_records
    );

    let mut page = LimitExecutor::from_pagination(Box::new(ValuesExecutor::new(matched)), pagination);
    let records = collect(&mut page)?;

    Ok(QueryOutput {
        records,
        pagination: metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn tool_call(id: i64, tool: &str, duration: i64) -> Record {
        let mut record = Record::new();
        record.insert("id".to_string(), Value::Integer(id));
        record.insert("tool".to_string(), Value::from(tool));
        record.insert("duration".to_string(), Value::Integer(duration));
        record
    }

    fn calls() -> Vec<Record> {
        vec![
            tool_call(1, "Bash", 300),
            tool_call(2, "Read", 10),
            tool_call(3, "Bash", 50),
            tool_call(4, "Edit", 700),
            tool_call(5, "Bash", 120),
        ]
    }

    fn ids(output: &QueryOutput) -> Vec<Value> {
        output.records.iter().map(|r| r["id"].clone()).collect()
    }

    #[test]
    fn test_query_matches() {
        let query = Query::parse("tool='Bash' AND duration > 100").unwrap();
        assert!(query.matches(&tool_call(1, "Bash", 300)).unwrap());
        assert!(!query.matches(&tool_call(3, "Bash", 50)).unwrap());
        assert_eq!(query.to_string(), "(tool = 'Bash' AND duration > 100)");
    }

    #[test]
    fn test_query_apply() {
        let query = Query::parse("tool IN ('Bash', 'Edit')").unwrap();
        let kept = query.apply(calls()).unwrap();
        assert_eq!(kept.len(), 4);

        let query = Query::parse("tool > 5").unwrap();
        let mut records = calls();
        records[0].insert("tool".to_string(), Value::Boolean(true));
        assert!(query.apply(records).is_err());
    }

    #[test]
    fn test_run_query_without_options() {
        let output = run_query(calls(), &QueryOptions::default()).unwrap();
        assert_eq!(output.records, calls());
        assert_eq!(output.pagination.total_records, 5);
        assert!(!output.pagination.has_more);
    }

    #[test]
    fn test_run_query_pipeline() {
        let options = QueryOptions {
            filter: Some("tool='Bash'".to_string()),
            sort_by: vec!["duration".to_string()],
            reverse: true,
            limit: 2,
            ..Default::default()
        };
        let output = run_query(calls(), &options).unwrap();

        assert_eq!(ids(&output), vec![Value::Integer(1), Value::Integer(5)]);
        assert_eq!(
            output.pagination,
            PaginationMetadata {
                total_records: 3,
                returned_records: 2,
                offset: 0,
                limit: 2,
                has_more: true,
            }
        );
    }

    #[test]
    fn test_run_query_offset() {
        let options = QueryOptions {
            sort_by: vec!["duration".to_string()],
            limit: 2,
            offset: 3,
            ..Default::default()
        };
        let output = run_query(calls(), &options).unwrap();
        assert_eq!(ids(&output), vec![Value::Integer(1), Value::Integer(4)]);
        assert!(!output.pagination.has_more);
    }

    #[test]
    fn test_run_query_parse_error() {
        let options = QueryOptions {
            filter: Some("tool=".to_string()),
            ..Default::default()
        };
        let err = run_query(calls(), &options).unwrap_err();
        assert!(matches!(err, FilterError::Parse(ParseError::ExpectedValue { .. })));
        assert!(err.to_string().starts_with("invalid filter: "));
    }

    #[test]
    fn test_run_query_evaluation_error() {
        let options = QueryOptions {
            filter: Some("tool REGEXP '[a-'".to_string()),
            ..Default::default()
        };
        let err = run_query(calls(), &options).unwrap_err();
        assert!(matches!(
            err,
            FilterError::Evaluation(ExpressionError::InvalidRegexp { .. })
        ));
        assert!(err.to_string().starts_with("filter evaluation error: "));
    }

    #[test]
    fn test_run_query_huge_limit() {
        let options = QueryOptions {
            limit: usize::MAX,
            offset: 1,
            ..Default::default()
        };
        let output = run_query(calls(), &options).unwrap();
        assert_eq!(output.records.len(), 4);
        assert_eq!(output.pagination.returned_records, 4);
        assert!(!output.pagination.has_more);
    }

    #[test]
    fn test_run_query_time_window_before_filter() {
        let options = QueryOptions {
            time: TimeFilter {
                last_n: 3,
                ..Default::default()
            },
            filter: Some("tool='Bash'".to_string()),
            ..Default::default()
        };
        let output = run_query(calls(), &options).unwrap();
        assert_eq!(ids(&output), vec![Value::Integer(3), Value::Integer(5)]);
        assert_eq!(output.pagination.total_records, 2);
    }

    #[test]
    fn test_run_query_invalid_since() {
        let options = QueryOptions {
            time: TimeFilter {
                since: Some("5 fortnights ago".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = run_query(calls(), &options).unwrap_err();
        assert!(matches!(
            err,
            FilterError::TimeWindow(DurationError::UnknownUnit(_))
        ));
    }
}
