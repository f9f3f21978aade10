//! Query results

use std::fmt;

/// The two lines a device returns for one query
///
/// `statement` is the device's echo of the query that was sent and
/// `response` is the answer. Both are stripped of trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Echo of the sent query
    pub statement: String,
    
    /// Answer line
    pub response: String,
}

impl QueryResult {
    /// Pair an echo line with a response line, stripping both
    pub fn new(statement: impl AsRef<str>, response: impl AsRef<str>) -> Self {
        Self {
            statement: statement.as_ref().trim_end().to_string(),
            response: response.as_ref().trim_end().to_string(),
        }
    }
    
    /// Whether the echo matches the statement that was sent
    ///
    /// Comparison ignores ASCII case.
    pub fn echo_matches(&self, sent: &str) -> bool {
        self.statement.eq_ignore_ascii_case(sent.trim_end())
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.statement, self.response)
    }
}
