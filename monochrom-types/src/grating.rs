//! Grating information

use std::fmt;

use crate::error::{Error, Result};

/// Installed grating, as reported by the device
///
/// The device answers a grating query with `number,lines,label`, for
/// example `1,1200,UV`. Fields are kept as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GratingDescriptor {
    /// Grating number (turret position)
    pub number: String,
    
    /// Ruling density in lines/mm
    pub lines: String,
    
    /// User-assigned label
    pub label: String,
}

impl GratingDescriptor {
    /// Number of comma-separated fields in a grating response
    pub const FIELD_COUNT: usize = 3;
    
    pub fn new(
        number: impl Into<String>,
        lines: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            lines: lines.into(),
            label: label.into(),
        }
    }
    
    /// Parse a `number,lines,label` response
    ///
    /// Surrounding whitespace is trimmed from each field.
    pub fn parse(response: &str) -> Result<Self> {
        let fields: Vec<&str> = response.split(',').map(str::trim).collect();
        
        match fields.as_slice() {
            [number, lines, label] => Ok(Self::new(*number, *lines, *label)),
            _ => Err(Error::FieldCount {
                expected: Self::FIELD_COUNT,
                actual: fields.len(),
                value: response.to_string(),
            }),
        }
    }
}

impl fmt::Display for GratingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grating[#{}, {} l/mm, {}]",
            self.number, self.lines, self.label
        )
    }
}
