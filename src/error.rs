use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The stream ended before the header block was complete.
    #[error("truncated report: missing {0}")]
    Truncated(&'static str),

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("unparseable date: {value:?}")]
    DateParse { value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
