//! Decoded SECS-II messages.

use crate::Item;
use serde::{Deserialize, Serialize};

/// One decoded message: its header fields and an optional item tree.
///
/// # Examples
///
/// ```rust
/// use secs_sml::{Item, SecsMessage};
///
/// let msg = SecsMessage::new(1, 3, true)
///     .with_name("SelectedStatusRequest")
///     .with_body(Item::list(Vec::new()));
///
/// assert_eq!(msg.stream, 1);
/// assert!(msg.is_primary());
/// assert!(msg.body.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct SecsMessage {
    /// Message name; empty when the header line carries none.
    pub name: String,
    pub stream: u8,
    pub function: u8,
    pub reply_expected: bool,
    /// Root item; `None` for a header-only message.
    pub body: Option<Item>,
}

impl SecsMessage {
    /// Creates a header-only message with an empty name.
    #[must_use]
    pub fn new(stream: u8, function: u8, reply_expected: bool) -> Self {
        SecsMessage {
            name: String::new(),
            stream,
            function,
            reply_expected,
            body: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Item) -> Self {
        self.body = Some(body);
        self
    }

    /// Primary messages carry an odd function number; replies an even one.
    #[inline]
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.function % 2 == 1
    }
}
