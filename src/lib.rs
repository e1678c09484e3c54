pub mod executor;
pub mod expression;
pub mod query;
pub mod record;
pub mod sql;
