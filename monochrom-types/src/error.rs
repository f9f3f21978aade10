pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Expected {expected} in response, got {value:?}")]
    InvalidNumber {
        expected: &'static str,
        value: String,
    },
    
    #[error("Expected {expected} comma-separated fields, got {actual} in {value:?}")]
    FieldCount {
        expected: usize,
        actual: usize,
        value: String,
    },
    
    #[error("Unknown units {0:?}")]
    UnknownUnits(String),
}
