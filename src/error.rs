//! Error types for SML decoding.
//!
//! Every failure aborts the message being decoded; no partial
//! [`SecsMessage`](crate::SecsMessage) is ever returned.
//!
//! ## Error Categories
//!
//! - **Format Errors**: a header or item line is missing a required delimiter
//! - **Unknown Format Errors**: an unrecognized format tag, or `L` requested as a leaf
//! - **Value Parse Errors**: a token does not parse as its target type or width
//! - **Structural Errors**: unbalanced list scopes, a missing terminator, or a broken count hint
//! - **I/O Errors**: the underlying line source failed
//!
//! Parse errors carry the 1-based line number of the offending line, counted from
//! the start of the line source. Errors from the standalone parsers
//! ([`parse_header`](crate::header::parse_header), [`parse_item`](crate::format::parse_item),
//! [`create_item`](crate::create_item)) have no source line and report line 0,
//! which [`Error::line`] returns as `None`.
//!
//! ## Examples
//!
//! ```rust
//! use secs_sml::from_str;
//!
//! let err = from_str("'S1F1'\n<U1[1] 256>\n.").unwrap_err();
//! assert!(err.is_value_parse());
//! assert_eq!(err.line(), Some(2));
//! ```

use thiserror::Error;

/// Line number of an error that did not come from a line source.
pub(crate) const NO_LINE: usize = 0;

/// Represents all possible errors that can occur while decoding SML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// IO error while reading from the line source
    #[error("IO error: {0}")]
    Io(String),

    /// A header or item line is missing a required delimiter
    #[error("Format error at line {line}: {msg}")]
    Format { line: usize, msg: String },

    /// Unrecognized format tag, or `L` requested as a leaf value
    #[error("Unknown SML format at line {line}: {format}")]
    UnknownFormat { line: usize, format: String },

    /// A token failed to parse as its target type
    #[error("Invalid {format} value at line {line}: '{token}' ({msg})")]
    ValueParse {
        line: usize,
        format: String,
        token: String,
        msg: String,
    },

    /// Unbalanced list scopes or a missing terminator
    #[error("Structural error at line {line}: {msg}")]
    Structural { line: usize, msg: String },
}

impl Error {
    /// Creates a format error for a line missing a delimiter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secs_sml::Error;
    ///
    /// let err = Error::format(3, "missing '['");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn format(line: usize, msg: &str) -> Self {
        Error::Format {
            line,
            msg: msg.to_string(),
        }
    }

    /// Creates an unknown-format error for an unrecognized tag.
    pub fn unknown_format(line: usize, format: &str) -> Self {
        Error::UnknownFormat {
            line,
            format: format.to_string(),
        }
    }

    /// Creates a value parse error for a token that does not convert.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secs_sml::Error;
    ///
    /// let err = Error::value_parse(7, "U1", "256", "number too large");
    /// assert!(err.to_string().contains("'256'"));
    /// ```
    pub fn value_parse<M: ToString>(line: usize, format: &str, token: &str, msg: M) -> Self {
        Error::ValueParse {
            line,
            format: format.to_string(),
            token: token.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a structural error (scope underflow, unclosed list, missing terminator).
    pub fn structural(line: usize, msg: &str) -> Self {
        Error::Structural {
            line,
            msg: msg.to_string(),
        }
    }

    /// Creates an I/O error for line source failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the line number the error refers to, if any.
    ///
    /// `None` for I/O errors and for errors raised outside a decoder.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Io(_) => None,
            Error::Format { line, .. }
            | Error::UnknownFormat { line, .. }
            | Error::ValueParse { line, .. }
            | Error::Structural { line, .. } => Some(*line).filter(|&line| line != NO_LINE),
        }
    }

    /// Replaces the line number of a parse error.
    ///
    /// The header and coercion layers do not know where their input came from and
    /// report [`NO_LINE`]; the decoder fills in the real position.
    #[must_use]
    pub(crate) fn at_line(mut self, at: usize) -> Self {
        match &mut self {
            Error::Io(_) => {}
            Error::Format { line, .. }
            | Error::UnknownFormat { line, .. }
            | Error::ValueParse { line, .. }
            | Error::Structural { line, .. } => *line = at,
        }
        self
    }

    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format { .. })
    }

    #[must_use]
    pub fn is_unknown_format(&self) -> bool {
        matches!(self, Error::UnknownFormat { .. })
    }

    #[must_use]
    pub fn is_value_parse(&self) -> bool {
        matches!(self, Error::ValueParse { .. })
    }

    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structural { .. })
    }

    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
