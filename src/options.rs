//! Configuration options for SML decoding.
//!
//! The defaults follow the notation as it is written in the field: the `[COUNT]`
//! hint on an item is advisory, nesting is unbounded, and blank lines are ignored.
//!
//! ## Examples
//!
//! ```rust
//! use secs_sml::{from_str_with_options, SmlOptions};
//!
//! let sml = "'S1F1'\n<U1[3] 1 2>\n.";
//!
//! // Permissive by default: the hint only pre-sizes storage
//! assert!(secs_sml::from_str(sml).is_ok());
//!
//! // Strict: the hint must match what was found
//! let err = from_str_with_options(sml, SmlOptions::strict()).unwrap_err();
//! assert!(err.is_structural());
//! ```

/// Configuration options for the SML decoder.
///
/// # Examples
///
/// ```rust
/// use secs_sml::SmlOptions;
///
/// let options = SmlOptions::new()
///     .with_strict_counts(true)
///     .with_max_depth(16)
///     .with_skip_blank_lines(false);
/// assert_eq!(options.max_depth, Some(16));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmlOptions {
    /// Require `[COUNT]` hints to match the actual element or child count.
    ///
    /// Text items are exempt.
    pub strict_counts: bool,
    /// Maximum list nesting depth; `None` leaves it unbounded.
    pub max_depth: Option<usize>,
    /// Ignore whitespace-only lines. When `false`, a blank body line is an error.
    pub skip_blank_lines: bool,
}

impl Default for SmlOptions {
    fn default() -> Self {
        SmlOptions {
            strict_counts: false,
            max_depth: None,
            skip_blank_lines: true,
        }
    }
}

impl SmlOptions {
    /// Creates default options (permissive counts, unbounded depth, blank lines skipped).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secs_sml::SmlOptions;
    ///
    /// let options = SmlOptions::new();
    /// assert!(!options.strict_counts);
    /// assert!(options.skip_blank_lines);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that validate every `[COUNT]` hint.
    #[must_use]
    pub fn strict() -> Self {
        SmlOptions {
            strict_counts: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_strict_counts(mut self, strict: bool) -> Self {
        self.strict_counts = strict;
        self
    }

    /// Bounds list nesting depth. Exceeding it aborts the decode.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }
}
