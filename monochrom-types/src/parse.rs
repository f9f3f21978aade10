//! Numeric response parsing

use crate::error::{Error, Result};

/// Parse a response line as a floating-point value
pub fn float(response: &str) -> Result<f64> {
    response
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidNumber {
            expected: "floating-point number",
            value: response.to_string(),
        })
}

/// Parse a response line as an integer
pub fn integer(response: &str) -> Result<i64> {
    response
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidNumber {
            expected: "integer",
            value: response.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    
    #[test]
    fn test_float() {
        assert_eq!(float("599.870").unwrap(), 599.87);
        assert_eq!(float(" 12 ").unwrap(), 12.0);
    }
    
    #[test]
    fn test_float_rejects_text() {
        assert!(matches!(float("BUSY"), Err(Error::InvalidNumber { .. })));
        assert!(float("").is_err());
    }
    
    #[test]
    fn test_integer() {
        assert_eq!(integer("2").unwrap(), 2);
        assert_eq!(integer("-15").unwrap(), -15);
    }
    
    #[test]
    fn test_integer_rejects_decimal() {
        let err = integer("2.5").unwrap_err();
        assert_eq!(err.to_string(), "Expected integer in response, got \"2.5\"");
    }
}
