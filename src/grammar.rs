//! The SML notation as accepted by this crate.
//!
//! This module holds no code; it documents the line grammar the decoder reads.
//!
//! # Messages
//!
//! A message is a header line, an optional body, and a terminator line holding `.`:
//!
//! ```text
//! EventReport:'S6F11' W
//! <L[3]
//!   <U4[1] 1001>
//!   <U4[1] 42>
//!   <L[0]
//!   >
//! >
//! .
//! ```
//!
//! Several messages may follow one another in the same source. Blank lines
//! between messages are ignored.
//!
//! # Header Line
//!
//! ```text
//! [name]:'S<stream>F<function>[ W]'[ W]
//! ```
//!
//! - The name is everything before the first `:` ahead of the `'S` marker, with
//!   surrounding whitespace trimmed; it may be absent or empty
//! - Stream and function are decimal numbers from 0 to 255
//! - A `W` after the function number marks a message that expects a reply, whether it
//!   sits inside the quotes (`'S6F11 W'`) or after them (`'S6F11' W`)
//!
//! # Body Lines
//!
//! Leading whitespace is insignificant. The first remaining character selects the kind
//! of line:
//!
//! | Line | Meaning |
//! |------|---------|
//! | `.` | End of message |
//! | `>` | Closes the innermost open list |
//! | `<L[n]` | Opens a list with `n` expected children |
//! | `<L[0] >` | An empty list, opened and closed on one line |
//! | `<F[n] values>` | A leaf item of format `F` |
//!
//! The value region of a leaf runs from the `]` to the **last** `>` on the line, so text
//! values may themselves contain `>`.
//!
//! `[n]` is a hint and may be left out (`<A "x">`, `<U1 1 2>`); the tag then ends at
//! the first space or `>`. When the hint is not a number it is ignored; when it is,
//! it pre-sizes storage and is only checked against the real count with
//! [`SmlOptions::strict_counts`](crate::SmlOptions::strict_counts).
//!
//! A list opener holds nothing but `<L[n]`, or `<L[n] >` for an empty list. Any other
//! text after it is ignored.
//!
//! # Formats
//!
//! | Tag | Item | Values |
//! |-----|------|--------|
//! | `L` | list | child lines up to the matching `>` |
//! | `A` | ASCII text | one string; surrounding spaces, `'` and `"` are trimmed |
//! | `J`, `JIS8` | JIS-8 text | as `A` |
//! | `Bool`, `Boolean` | `bool` array | `true` / `false`, any case |
//! | `B`, `Binary` | byte array | decimal, or hexadecimal with a `0x` prefix |
//! | `I1` `I2` `I4` `I8` | signed arrays | decimal, range checked per width |
//! | `U1` `U2` `U4` `U8` | unsigned arrays | decimal, range checked per width |
//! | `F4` `F8` | float arrays | decimal or exponent notation |
//!
//! Array values are separated by single spaces; runs of spaces are allowed, tabs are
//! not separators. An empty value region gives an empty array, and an empty text value
//! (`<A "">`) is a present, empty string.
//!
//! # Errors
//!
//! | Condition | Error |
//! |-----------|-------|
//! | missing `'S`, `F`, closing quote, `<`, `]` after `[`, or closing `>` | [`Error::Format`](crate::Error::Format) |
//! | unknown tag | [`Error::UnknownFormat`](crate::Error::UnknownFormat) |
//! | token out of range or not a number | [`Error::ValueParse`](crate::Error::ValueParse) |
//! | unmatched `>`, unclosed list, second root, missing `.` | [`Error::Structural`](crate::Error::Structural) |
