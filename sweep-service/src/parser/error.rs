// Parser error types with helpful error messages
// Provides location info and suggestions for malformed matrix specifications

use std::fmt;

/// Detailed parse error for a matrix specification.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Where the error was found: a row number for tabular input, a
    /// `category/parameter` path for nested input
    pub location: Option<String>,
    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
    /// The kind of error
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Required header column absent from tabular input
    MissingHeader,
    /// Entry declares both a constant and a range, or only part of a range
    MixedEntry,
    /// Entry declares neither a constant nor a range
    EmptyEntry,
    /// Sample count is not a positive integer
    NonIntegerCount,
    /// Range bound did not coerce to a number
    NonNumericBound,
    /// Nested input has the wrong shape (non-mapping category, bad list item)
    InvalidShape,
    /// YAML syntax error
    YamlSyntax,
    /// IO error (file not found, etc.)
    IoError,
}

impl ParseError {
    pub fn new(message: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            message: message.into(),
            location: None,
            suggestion: None,
            kind,
        }
    }

    /// Attach a location (row number or mapping path).
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn io(err: &std::io::Error, path: impl Into<String>) -> Self {
        ParseError::new(format!("{}", err), ParseErrorKind::IoError).at(path)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)?;
        if let Some(location) = &self.location {
            write!(f, "\n  --> {}", location)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nhelp: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(
            "row declares both a constant and a range",
            ParseErrorKind::MixedEntry,
        )
        .at("row 4")
        .with_suggestion("populate CON or LO/HI/NUM, never both");

        let output = format!("{}", err);
        assert!(output.contains("error: row declares both"));
        assert!(output.contains("--> row 4"));
        assert!(output.contains("help:"));
    }

    #[test]
    fn test_parse_error_without_location() {
        let err = ParseError::new("no data rows", ParseErrorKind::EmptyEntry);
        assert_eq!(format!("{}", err), "error: no data rows");
    }
}
