//! Command line construction
//!
//! A command is a mnemonic followed by zero or more arguments, joined with
//! single spaces. A query is a bare mnemonic ending in `?`.

use std::fmt;

use crate::constants::QUERY_SUFFIX;

/// A command line to send to the device
///
/// # Examples
///
/// ```
/// use monochrom_core::Command;
///
/// let cmd = Command::new("gowave").arg(format!("{:.3}", 500.0));
/// assert_eq!(cmd.to_string(), "gowave 500.000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    name: String,
    args: Vec<String>,
}

impl Command {
    /// Create a command with no arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
    
    /// Append one argument, using its `Display` form
    pub fn arg(mut self, arg: impl fmt::Display) -> Self {
        self.args.push(arg.to_string());
        self
    }
    
    /// Command mnemonic
    pub fn name(&self) -> &str {
        &self.name
    }
    
    /// Arguments in order
    pub fn args(&self) -> &[String] {
        &self.args
    }
    
    /// Render the line that goes on the wire (before framing)
    pub fn line(&self) -> String {
        let mut line = self.name.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl From<&str> for Command {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Command {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line())
    }
}

/// Normalize a bare command name into a query statement
///
/// Appends `?` unless the message already ends with one.
///
/// ```
/// use monochrom_core::command::query_statement;
///
/// assert_eq!(query_statement("wave"), "wave?");
/// assert_eq!(query_statement("WAVE?"), "WAVE?");
/// ```
pub fn query_statement(message: &str) -> String {
    if message.ends_with(QUERY_SUFFIX) {
        message.to_string()
    } else {
        format!("{}{}", message, QUERY_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    
    #[test]
    fn test_command_without_args() {
        assert_eq!(Command::new("abort").line(), "abort");
    }
    
    #[test]
    fn test_command_joins_args_with_single_spaces() {
        let cmd = Command::new("slit1microns").arg(50).arg("x");
        assert_eq!(cmd.line(), "slit1microns 50 x");
        assert_eq!(cmd.args(), &["50".to_string(), "x".to_string()]);
    }
    
    #[test]
    fn test_command_from_str() {
        let cmd: Command = "abort".into();
        assert_eq!(cmd.name(), "abort");
        assert!(cmd.args().is_empty());
    }
    
    #[test]
    fn test_query_statement_appends_suffix_once() {
        assert_eq!(query_statement("grat"), "grat?");
        assert_eq!(query_statement("grat?"), "grat?");
        assert_eq!(query_statement(""), "?");
    }
    
    proptest! {
        #[test]
        fn prop_query_normalization_is_case_and_suffix_idempotent(name in "[a-z0-9]{1,16}") {
            let lower = Frame::new(query_statement(&name)).encode().unwrap();
            let upper = Frame::new(query_statement(&format!("{}?", name.to_ascii_uppercase())))
                .encode()
                .unwrap();
            
            prop_assert_eq!(lower, upper);
        }
    }
}
