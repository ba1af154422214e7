//! # secs_sml
//!
//! A streaming decoder for SML, the human-readable notation of SECS-II messages.
//!
//! ## What is SML?
//!
//! SECS-II is the message layer spoken between semiconductor equipment and host
//! software. SML writes those messages as text: a header line naming the
//! stream/function pair, an indented tree of typed items, and a `.` terminator.
//!
//! ```text
//! EventReport:'S6F11' W
//! <L[3]
//!   <U4[1] 1001>
//!   <U4[1] 42>
//!   <L[1]
//!     <A "LotStarted">
//!   >
//! >
//! .
//! ```
//!
//! ## Key Features
//!
//! - **Typed Trees**: every leaf decodes to a fixed-width array (`U1`, `I4`, `F8`, ...) or text
//! - **Streaming**: decode message after message from any [`BufRead`](std::io::BufRead),
//!   or from a tokio reader with the `async` feature
//! - **Iterative**: nested lists are rebuilt on an explicit stack, never by recursion
//! - **Borrowing**: lines and values are sliced from the input until a typed value is built
//! - **Fail Fast**: errors carry their line number and no partial message is returned
//!
//! ## Quick Start
//!
//! ```rust
//! use secs_sml::{from_str, Item};
//!
//! let sml = "\
//! Hello:'S1F13' W
//! <L[2]
//!   <A \"MDLN\">
//!   <A \"1.0.3\">
//! >
//! .";
//!
//! let msg = from_str(sml).unwrap();
//! assert_eq!((msg.stream, msg.function), (1, 13));
//! assert!(msg.reply_expected);
//! assert_eq!(
//!     msg.body,
//!     Some(Item::list([Item::from("MDLN"), Item::from("1.0.3")]))
//! );
//! ```
//!
//! ### Many Messages
//!
//! ```rust
//! use secs_sml::messages_from_str;
//!
//! let log = "'S1F1' W\n.\n'S1F2'\n<L[0]\n>\n.\n";
//! let messages: Vec<_> = messages_from_str(log).collect::<Result<_, _>>().unwrap();
//! assert_eq!(messages.len(), 2);
//! ```
//!
//! ### Options
//!
//! The `[COUNT]` on each item is advisory unless [`SmlOptions::strict_counts`] is set:
//!
//! ```rust
//! use secs_sml::{from_str_with_options, SmlOptions};
//!
//! let sml = "'S1F1'\n<L[2]\n<A \"only one\">\n>\n.";
//! assert!(secs_sml::from_str(sml).is_ok());
//! assert!(from_str_with_options(sml, SmlOptions::strict()).is_err());
//! ```
//!
//! ## Logging
//!
//! Decoding emits [`tracing`] events: `debug` for each header and for count
//! hints that do not match, `trace` for every list opened and closed. Install a
//! subscriber to see them.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - All slicing is done at delimiter positions found in the same line
//! - Proper error propagation with `Result` types
//! - No panics in the public API
//!
//! See the [`grammar`] module for the full notation.

pub mod de;
pub mod error;
pub mod format;
pub mod grammar;
pub mod header;
pub mod item;
pub mod macros;
pub mod message;
pub mod options;
pub mod stream;

pub use de::{Decoder, LineSource, ReaderLines, StrLines};
pub use error::{Error, Result};
pub use format::SecsFormat;
pub use header::MessageHeader;
pub use item::Item;
pub use message::SecsMessage;
pub use options::SmlOptions;
pub use stream::Messages;

#[cfg(feature = "async")]
pub use stream::AsyncDecoder;

use std::io;

/// Decode one message from a string of SML text.
///
/// Text after the message's terminator is ignored.
///
/// # Examples
///
/// ```rust
/// use secs_sml::{from_str, Item};
///
/// let msg = from_str("'S1F4'\n<U1[3] 1 2 255>\n.").unwrap();
/// assert_eq!(msg.body, Some(Item::U1(vec![1, 2, 255])));
/// ```
///
/// # Errors
///
/// Returns an error if the text is not a well-formed SML message.
/// Error messages include the line number.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(s: &str) -> Result<SecsMessage> {
    from_str_with_options(s, SmlOptions::default())
}

/// Decode one message from a string of SML text with custom options.
///
/// # Errors
///
/// Returns an error if the text is not a well-formed SML message under `options`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(s: &str, options: SmlOptions) -> Result<SecsMessage> {
    Decoder::with_options(StrLines::new(s), options).decode_message()
}

/// Decode one message from a buffered reader.
///
/// Only the lines of the first message are consumed.
///
/// # Examples
///
/// ```rust
/// use secs_sml::from_reader;
/// use std::io::Cursor;
///
/// let msg = from_reader(Cursor::new("Ping:'S2F25' W\n<B[2] 0x01 0x02>\n.\n")).unwrap();
/// assert_eq!(msg.name, "Ping");
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid UTF-8, or the text is
/// not a well-formed SML message.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(reader: R) -> Result<SecsMessage>
where
    R: io::BufRead,
{
    Decoder::from_reader(reader).decode_message()
}

/// Decode one message from bytes of SML text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or not a well-formed SML message.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(v: &[u8]) -> Result<SecsMessage> {
    let s = std::str::from_utf8(v).map_err(|e| Error::io(&e.to_string()))?;
    from_str(s)
}

/// Iterate over every message in a string of SML text.
///
/// # Examples
///
/// ```rust
/// use secs_sml::messages_from_str;
///
/// let mut messages = messages_from_str("'S1F1' W\n.\n'S1F2'\n.\n");
/// assert_eq!(messages.next().unwrap().unwrap().function, 1);
/// assert_eq!(messages.next().unwrap().unwrap().function, 2);
/// assert!(messages.next().is_none());
/// ```
pub fn messages_from_str(s: &str) -> Messages<StrLines<'_>> {
    Decoder::from_str(s).into_messages()
}

/// Iterate over every message read from a buffered reader.
pub fn messages_from_reader<R>(reader: R) -> Messages<ReaderLines<R>>
where
    R: io::BufRead,
{
    Decoder::from_reader(reader).into_messages()
}

/// Build a leaf item from a format and its SML value text.
///
/// # Examples
///
/// ```rust
/// use secs_sml::{create_item, Item, SecsFormat};
///
/// assert_eq!(create_item(SecsFormat::I2, "-1 300").unwrap(), Item::I2(vec![-1, 300]));
/// assert_eq!(create_item(SecsFormat::Ascii, "\"\"").unwrap(), Item::Ascii(String::new()));
/// assert!(create_item(SecsFormat::List, "").is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::UnknownFormat`] for [`SecsFormat::List`] and [`Error::ValueParse`]
/// if a value does not convert.
/// Neither carries a line number.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn create_item(format: SecsFormat, value: &str) -> Result<Item> {
    crate::format::coerce(format, format.sml_tag(), value, None)
}
