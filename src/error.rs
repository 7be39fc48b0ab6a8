use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed tag list {raw:?}: {reason}")]
    MalformedTagList { raw: String, reason: &'static str },
    #[error("{value} does not decode to a YYYYMMDD calendar date")]
    DateDecode { value: i64 },
    #[error("could not parse {value:?} as a YYYY-MM-DD date")]
    InvalidDateInput { value: String },
    #[error("selected date {selected} is outside {earliest}..={latest}")]
    InvalidSelection {
        selected: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
    #[error("no records found for {what}")]
    EmptyResultSet { what: &'static str },
    #[error("offer store query failed: {0}")]
    Store(#[from] sqlx::Error),
    #[error("offer snapshot could not be read: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
