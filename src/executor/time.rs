//! Time-window filtering of records.
//!
//! Records carry their timestamp as an RFC 3339 string in a configurable
//! field. A window is given as a relative `since` duration ("5 minutes
//! ago"), absolute Unix bounds, or simply the last N records.

use crate::record::{Record, Value};
use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// Field holding the record timestamp unless configured otherwise
pub const DEFAULT_TIME_FIELD: &str = "timestamp";

/// Errors raised while interpreting a relative duration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DurationError {
    #[error("duration must end with ' ago'")]
    MissingAgo,

    #[error("invalid duration format (expected '<number> <unit> ago')")]
    InvalidFormat,

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("unknown time unit: {0}")]
    UnknownUnit(String),

    #[error("duration out of range: {0}")]
    OutOfRange(String),
}

/// Parse a human readable duration such as `5 minutes ago` or `1 hour ago`.
///
/// Units are seconds, minutes, hours and days, singular or plural.
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let s = input.trim().to_lowercase();
    let s = s.strip_suffix(" ago").ok_or(DurationError::MissingAgo)?;

    let parts: Vec<&str> = s.split_whitespace().collect();
    let &[number, unit] = parts.as_slice() else {
        return Err(DurationError::InvalidFormat);
    };

    let number: i64 = number
        .parse()
        .map_err(|_| DurationError::InvalidNumber(number.to_string()))?;

    let unit = match unit.strip_suffix('s') {
        Some(singular) if !singular.is_empty() => singular,
        _ => unit,
    };
    let seconds_per_unit = match unit {
        "second" => 1,
        "minute" => 60,
        "hour" => 60 * 60,
        "day" => 24 * 60 * 60,
        other => return Err(DurationError::UnknownUnit(other.to_string())),
    };

    number
        .checked_mul(seconds_per_unit)
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(|| DurationError::OutOfRange(input.trim().to_string()))
}

/// Time window applied to records before the filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFilter {
    /// Field holding the RFC 3339 timestamp
    pub field: String,
    /// Relative lower bound, e.g. "5 minutes ago"
    pub since: Option<String>,
    /// Keep only the last N records, 0 to disable
    pub last_n: usize,
    /// Unix lower bound in seconds, 0 to disable
    pub from_ts: i64,
    /// Unix upper bound in seconds, 0 to disable
    pub to_ts: i64,
}

impl Default for TimeFilter {
    fn default() -> Self {
        Self {
            field: DEFAULT_TIME_FIELD.to_string(),
            since: None,
            last_n: 0,
            from_ts: 0,
            to_ts: 0,
        }
    }
}

impl TimeFilter {
    /// Whether this filter keeps every record
    pub fn is_empty(&self) -> bool {
        self.since.is_none() && self.last_n == 0 && self.from_ts == 0 && self.to_ts == 0
    }

    /// Apply the window relative to `now`.
    ///
    /// `last_n` takes precedence over the timestamp bounds and keeps the
    /// tail of the input. Otherwise records whose timestamp is missing or
    /// unparseable are dropped.
    pub fn apply(
        &self,
        records: Vec<Record>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Record>, DurationError> {
        if self.is_empty() {
            return Ok(records);
        }

        if self.last_n > 0 {
            let skip = records.len().saturating_sub(self.last_n);
            return Ok(records.into_iter().skip(skip).collect());
        }

        let cutoff = match &self.since {
            Some(since) => {
                let duration = parse_duration(since)?;
                let cutoff = now
                    .checked_sub_signed(duration)
                    .ok_or_else(|| DurationError::OutOfRange(since.clone()))?;
                Some(cutoff)
            }
            None => None,
        };

        let total = records.len();
        let kept: Vec<Record> = records
            .into_iter()
            .filter(|record| match self.timestamp(record) {
                Some(ts) => {
                    cutoff.map_or(true, |cutoff| ts >= cutoff)
                        && (self.from_ts <= 0 || ts.timestamp() >= self.from_ts)
                        && (self.to_ts <= 0 || ts.timestamp() <= self.to_ts)
                }
                None => false,
            })
            .collect();

        log::debug!("time window kept {} of {} records", kept.len(), total);
        Ok(kept)
    }

    fn timestamp(&self, record: &Record) -> Option<DateTime<Utc>> {
        match record.get(&self.field) {
            Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            _ => None,
        }
    }
}
