//! SML decoding.
//!
//! This module provides the [`Decoder`], which reads SML messages one line at a time
//! from a [`LineSource`].
//!
//! ## Overview
//!
//! - **Line oriented**: every line is either a header, an item, a list closer (`>`),
//!   or the terminator (`.`)
//! - **Iterative**: nested lists are rebuilt on an explicit stack of open scopes, so
//!   nesting depth is bounded by memory rather than by the call stack
//! - **Borrowing**: lines and value regions are sliced from the source buffer; only
//!   typed values are allocated
//! - **Fail fast**: the first error aborts the message; nothing partial is returned
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use secs_sml::{from_str, Item};
//!
//! let sml = "\
//! Hello:'S1F1' W
//! <L[2]
//!   <A \"x\">
//!   <A \"y\">
//! >
//! .";
//! let msg = from_str(sml).unwrap();
//! assert_eq!(msg.name, "Hello");
//! assert_eq!(msg.body, Some(Item::list([Item::from("x"), Item::from("y")])));
//! ```
//!
//! Several messages can share one source:
//!
//! ```rust
//! use secs_sml::Decoder;
//!
//! let mut decoder = Decoder::from_str("'S1F1' W\n.\n'S1F2'\n<L[0]>\n.\n");
//! assert_eq!(decoder.next_message().unwrap().unwrap().function, 1);
//! assert_eq!(decoder.next_message().unwrap().unwrap().function, 2);
//! assert!(decoder.next_message().unwrap().is_none());
//! ```

use crate::format::{self, MAX_PREALLOCATION};
use crate::header::{parse_header, MessageHeader};
use crate::{Error, Item, Result, SecsFormat, SecsMessage, SmlOptions};
use std::io::BufRead;
use tracing::{debug, trace};

/// A forward-only source of text lines.
///
/// Returned lines exclude the line terminator and borrow from the source until the
/// next call.
pub trait LineSource {
    /// Returns the next line, or `None` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying reader fails.
    fn next_line(&mut self) -> Result<Option<&str>>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> Result<Option<&str>> {
        (**self).next_line()
    }
}

/// Lines of an in-memory string, sliced without copying.
pub struct StrLines<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> StrLines<'a> {
    pub fn new(input: &'a str) -> Self {
        StrLines {
            lines: input.lines(),
        }
    }
}

impl LineSource for StrLines<'_> {
    fn next_line(&mut self) -> Result<Option<&str>> {
        Ok(self.lines.next())
    }
}

/// Lines of any [`BufRead`], read into one reused buffer.
pub struct ReaderLines<R> {
    reader: R,
    buf: String,
}

impl<R: BufRead> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        ReaderLines {
            reader,
            buf: String::new(),
        }
    }

    /// Consume the source and return the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> LineSource for ReaderLines<R> {
    fn next_line(&mut self) -> Result<Option<&str>> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_line_ending(&self.buf)))
    }
}

pub(crate) fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// The SML decoder.
///
/// Decodes [`SecsMessage`]s from a [`LineSource`], one message per call.
/// Created via [`Decoder::from_str`], [`Decoder::from_reader`], or [`Decoder::new`].
pub struct Decoder<S> {
    source: S,
    options: SmlOptions,
    line: usize,
}

impl<'a> Decoder<StrLines<'a>> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'a str) -> Self {
        Decoder::new(StrLines::new(input))
    }
}

impl<R: BufRead> Decoder<ReaderLines<R>> {
    pub fn from_reader(reader: R) -> Self {
        Decoder::new(ReaderLines::new(reader))
    }
}

impl<S: LineSource> Decoder<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, SmlOptions::default())
    }

    pub fn with_options(source: S, options: SmlOptions) -> Self {
        Decoder {
            source,
            options,
            line: 0,
        }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn options(&self) -> &SmlOptions {
        &self.options
    }

    /// Borrow the underlying line source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Consume the decoder and return the line source at its current position.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Decodes the next message, or returns `None` if only blank lines remain.
    ///
    /// On error the source is left just after the offending line.
    ///
    /// # Errors
    ///
    /// Any [`Error`] raised by the header, item, or coercion layers, and
    /// [`Error::Structural`] if the source ends before the `.` terminator.
    pub fn next_message(&mut self) -> Result<Option<SecsMessage>> {
        let mut parser = MessageParser::new(&self.options);
        while let Some(line) = self.source.next_line()? {
            self.line += 1;
            if let Some(message) = parser.feed(line, self.line)? {
                return Ok(Some(message));
            }
        }
        parser.finish(self.line)
    }

    /// Decodes exactly one message.
    ///
    /// # Errors
    ///
    /// As [`Decoder::next_message`], plus [`Error::Structural`] if the source holds
    /// no message at all.
    pub fn decode_message(&mut self) -> Result<SecsMessage> {
        self.next_message()?.ok_or_else(|| {
            Error::structural(self.line, "unexpected end of input, expected a message header")
        })
    }
}

/// Assembles one message from the lines fed to it.
///
/// Shared by the blocking and the async decoders; it never reads on its own.
pub(crate) struct MessageParser<'o> {
    header: Option<MessageHeader>,
    items: ItemTreeParser<'o>,
}

impl<'o> MessageParser<'o> {
    pub(crate) fn new(options: &'o SmlOptions) -> Self {
        MessageParser {
            header: None,
            items: ItemTreeParser::new(options),
        }
    }

    /// Feeds one line; returns the message once its terminator has been seen.
    pub(crate) fn feed(&mut self, line: &str, line_no: usize) -> Result<Option<SecsMessage>> {
        if self.header.is_none() {
            if !line.trim().is_empty() {
                let header = parse_header(line).map_err(|e| e.at_line(line_no))?;
                debug!(
                    name = %header.name,
                    stream = header.stream,
                    function = header.function,
                    reply_expected = header.reply_expected,
                    line = line_no,
                    "decoded message header"
                );
                self.header = Some(header);
            }
            return Ok(None);
        }

        if !self.items.feed(line, line_no)? {
            return Ok(None);
        }

        let Some(header) = self.header.take() else {
            return Ok(None);
        };
        Ok(Some(SecsMessage {
            name: header.name,
            stream: header.stream,
            function: header.function,
            reply_expected: header.reply_expected,
            body: self.items.take_root(),
        }))
    }

    /// Ends the message at end of input.
    ///
    /// Returns `None` if no header was seen; anything else is a missing terminator.
    pub(crate) fn finish(self, line_no: usize) -> Result<Option<SecsMessage>> {
        if self.header.is_none() {
            debug!(line = line_no, "reached end of SML input");
            return Ok(None);
        }
        let msg = match self.items.depth() {
            0 => "unexpected end of input before '.' terminator".to_string(),
            open => format!("unexpected end of input with {open} unclosed list(s)"),
        };
        Err(Error::structural(line_no, &msg))
    }
}

/// A list whose closer line has not arrived yet.
struct OpenScope {
    children: Vec<Item>,
    hint: Option<usize>,
    opened_at: usize,
}

/// Rebuilds an item tree from body lines using an explicit stack of open lists.
struct ItemTreeParser<'o> {
    options: &'o SmlOptions,
    stack: Vec<OpenScope>,
    root: Option<Item>,
}

impl<'o> ItemTreeParser<'o> {
    fn new(options: &'o SmlOptions) -> Self {
        ItemTreeParser {
            options,
            stack: Vec::new(),
            root: None,
        }
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn take_root(&mut self) -> Option<Item> {
        self.root.take()
    }

    /// Consumes one body line. Returns `true` once the terminator is reached.
    fn feed(&mut self, line: &str, line_no: usize) -> Result<bool> {
        let line = line.trim_start();
        match line.as_bytes().first() {
            None if self.options.skip_blank_lines => Ok(false),
            None => Err(Error::format(line_no, "blank line in message body")),
            Some(b'.') => {
                if let Some(scope) = self.stack.last() {
                    let msg = format!(
                        "terminator reached with the list opened at line {} still open",
                        scope.opened_at
                    );
                    return Err(Error::structural(line_no, &msg));
                }
                Ok(true)
            }
            Some(b'>') => {
                self.close_scope(line_no)?;
                Ok(false)
            }
            Some(_) => {
                self.parse_item_line(line, line_no)?;
                Ok(false)
            }
        }
    }

    /// Handles `<FORMAT[COUNT] VALUE>`, or `<L[COUNT]` which opens a list.
    ///
    /// `[COUNT]` may be left out; the tag then runs to the first whitespace or `>`.
    fn parse_item_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let open = line
            .find('<')
            .ok_or_else(|| Error::format(line_no, "missing '<' in item line"))?;
        let item = line[open + 1..].trim_start();
        let tag_end = item
            .find(|c: char| c == '[' || c == '>' || c.is_whitespace())
            .unwrap_or(item.len());
        let tag = &item[..tag_end];
        let after_tag = &item[tag_end..];

        let (hint, rest) = match after_tag.trim_start().strip_prefix('[') {
            Some(size) => {
                let size_close = size
                    .find(']')
                    .ok_or_else(|| Error::format(line_no, "missing ']' in item line"))?;
                (
                    size[..size_close].trim().parse::<usize>().ok(),
                    &size[size_close + 1..],
                )
            }
            None => (None, after_tag),
        };

        let format = SecsFormat::from_sml_tag(tag)
            .ok_or_else(|| Error::unknown_format(line_no, tag))?;

        if format.is_list() {
            self.open_scope(hint, line_no)?;
            // `<L[0] >` opens and closes on one line.
            match rest.trim() {
                "" => {}
                ">" => self.close_scope(line_no)?,
                ignored => debug!(line = line_no, ignored, "ignored text after list opener"),
            }
            return Ok(());
        }

        let value_end = rest
            .rfind('>')
            .ok_or_else(|| Error::format(line_no, "missing closing '>' in item line"))?;
        let item = format::coerce(format, tag, &rest[..value_end], hint)
            .map_err(|e| e.at_line(line_no))?;
        if !format.is_text() {
            self.check_count(hint, item.len(), tag, line_no)?;
        }
        self.attach(item, line_no)
    }

    fn open_scope(&mut self, hint: Option<usize>, line_no: usize) -> Result<()> {
        if let Some(max) = self.options.max_depth {
            if self.stack.len() >= max {
                let msg = format!("list nesting exceeds the maximum depth of {max}");
                return Err(Error::structural(line_no, &msg));
            }
        }
        self.stack.push(OpenScope {
            children: Vec::with_capacity(hint.unwrap_or(0).min(MAX_PREALLOCATION)),
            hint,
            opened_at: line_no,
        });
        trace!(depth = self.stack.len(), line = line_no, "opened list");
        Ok(())
    }

    fn close_scope(&mut self, line_no: usize) -> Result<()> {
        let scope = self
            .stack
            .pop()
            .ok_or_else(|| Error::structural(line_no, "'>' closes a list that was never opened"))?;
        trace!(depth = self.stack.len(), line = line_no, "closed list");

        self.check_count(scope.hint, scope.children.len(), "L", line_no)?;
        self.attach(Item::list(scope.children), line_no)
    }

    fn check_count(&self, hint: Option<usize>, actual: usize, tag: &str, line_no: usize) -> Result<()> {
        let Some(declared) = hint else {
            return Ok(());
        };
        if declared == actual {
            return Ok(());
        }
        if self.options.strict_counts {
            let msg = format!("{tag} declares {declared} element(s) but holds {actual}");
            return Err(Error::structural(line_no, &msg));
        }
        debug!(tag, declared, actual, line = line_no, "count hint does not match");
        Ok(())
    }

    /// Appends to the innermost open list, or sets the root.
    fn attach(&mut self, item: Item, line_no: usize) -> Result<()> {
        if let Some(scope) = self.stack.last_mut() {
            scope.children.push(item);
        } else if self.root.is_some() {
            return Err(Error::structural(line_no, "message has more than one root item"));
        } else {
            self.root = Some(item);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode(input: &str) -> Result<SecsMessage> {
        Decoder::from_str(input).decode_message()
    }

    #[test]
    fn test_flat_list() {
        let msg = decode("'S1F1'\n<L[2]\n<A \"x\">\n<A \"y\">\n>\n.").unwrap();
        assert_eq!(msg.body, Some(Item::list([Item::from("x"), Item::from("y")])));
    }

    #[test]
    fn test_empty_list_is_distinct_from_absent_body() {
        let empty = decode("'S1F1'\n<L[0]\n>\n.").unwrap();
        assert_eq!(empty.body, Some(Item::List(vec![])));

        let inline = decode("'S1F1'\n<L[0] >\n.").unwrap();
        assert_eq!(inline.body, Some(Item::List(vec![])));

        let header_only = decode("'S1F1'\n.").unwrap();
        assert_eq!(header_only.body, None);
    }

    #[test]
    fn test_nested_lists() {
        let sml = "'S2F41' W\n<L[2]\n  <A 'START'>\n  <L[1]\n    <L[2]\n      <A 'PPID'>\n      <U4[1] 7>\n    >\n  >\n>\n.";
        let msg = decode(sml).unwrap();
        let expected = Item::list([
            Item::from("START"),
            Item::list([Item::list([Item::from("PPID"), Item::U4(vec![7])])]),
        ]);
        assert_eq!(msg.body, Some(expected));
    }

    #[test]
    fn test_scalar_root() {
        let msg = decode("'S1F2'\n<B[1] 0x00>\n.").unwrap();
        assert_eq!(msg.body, Some(Item::Binary(vec![0])));
    }

    #[test]
    fn test_value_may_contain_angle_brackets() {
        let msg = decode("'S10F3'\n<A \"a > b\">\n.").unwrap();
        assert_eq!(msg.body, Some(Item::from("a > b")));
    }

    #[test]
    fn test_unmatched_closer() {
        let err = decode("'S1F1'\n<L[0]\n>\n>\n.").unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_terminator_with_open_list() {
        let err = decode("'S1F1'\n<L[1]\n<A \"x\">\n.").unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_missing_terminator() {
        let err = decode("'S1F1'\n<L[1]\n<A \"x\">\n>").unwrap_err();
        assert!(err.is_structural());

        let err = decode("'S1F1'\n<L[1]").unwrap_err();
        assert!(err.to_string().contains("1 unclosed list"));
    }

    #[test]
    fn test_empty_input() {
        assert!(Decoder::from_str("").next_message().unwrap().is_none());
        assert!(Decoder::from_str("\n  \n").next_message().unwrap().is_none());
        assert!(decode("").unwrap_err().is_structural());
    }

    #[test]
    fn test_two_roots() {
        let err = decode("'S1F1'\n<A \"x\">\n<A \"y\">\n.").unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_leaf_without_count_hint() {
        let msg = decode("'S1F1'\n<L[2]\n<A \"x\">\n<A \"y\">\n>\n.").unwrap();
        assert_eq!(msg.body, Some(Item::list([Item::from("x"), Item::from("y")])));

        let msg = decode("'S1F1'\n<U1 1 2 255>\n.").unwrap();
        assert_eq!(msg.body, Some(Item::U1(vec![1, 2, 255])));

        let msg = decode("'S1F1'\n<A>\n.").unwrap();
        assert_eq!(msg.body, Some(Item::Ascii(String::new())));

        let msg = decode("'S1F1'\n<L\n<B 0x1F>\n>\n.").unwrap();
        assert_eq!(msg.body, Some(Item::list([Item::Binary(vec![31])])));
    }

    #[test]
    fn test_leaf_without_count_hint_is_not_count_checked() {
        let strict = SmlOptions::strict();
        let msg = Decoder::with_options(StrLines::new("'S1F1'\n<U2 1 2 3>\n."), strict)
            .decode_message()
            .unwrap();
        assert_eq!(msg.body, Some(Item::U2(vec![1, 2, 3])));
    }

    #[test]
    fn test_text_after_list_opener_is_ignored() {
        let msg = decode("'S1F1'\n<L[1] <U1[1] 5>\n>\n.").unwrap();
        assert_eq!(msg.body, Some(Item::list(Vec::new())));
    }

    #[test]
    fn test_missing_item_delimiters() {
        assert!(decode("'S1F1'\nA[1] \"x\">\n.").unwrap_err().is_format());
        assert!(decode("'S1F1'\n<A[1 \"x\">\n.").unwrap_err().is_format());
        assert!(decode("'S1F1'\n<U1[1] 1\n.").unwrap_err().is_format());
    }

    #[test]
    fn test_unknown_format_reports_line() {
        let err = decode("'S1F1'\n<L[1]\n<Q8[1] 1>\n>\n.").unwrap_err();
        assert_eq!(err, Error::unknown_format(3, "Q8"));
    }

    #[test]
    fn test_value_error_reports_line() {
        let err = decode("'S1F1'\n<L[2]\n<U1[1] 1>\n<U1[1] 256>\n>\n.").unwrap_err();
        assert!(err.is_value_parse());
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_header_error_reports_line() {
        let mut decoder = Decoder::from_str("\n\nS1F1\n.");
        let err = decoder.next_message().unwrap_err();
        assert!(err.is_format());
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_count_hint_is_advisory_by_default() {
        let msg = decode("'S1F1'\n<L[5]\n<U1[1] 1 2 3>\n>\n.").unwrap();
        assert_eq!(msg.body, Some(Item::list([Item::U1(vec![1, 2, 3])])));
    }

    #[test]
    fn test_strict_counts() {
        let strict = SmlOptions::strict();

        let ok = "'S1F1'\n<L[1]\n<U1[3] 1 2 3>\n>\n.";
        assert!(Decoder::with_options(StrLines::new(ok), strict.clone())
            .decode_message()
            .is_ok());

        let bad_list = "'S1F1'\n<L[2]\n<U1[1] 1>\n>\n.";
        let err = Decoder::with_options(StrLines::new(bad_list), strict.clone())
            .decode_message()
            .unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.line(), Some(4));

        // Text counts are character lengths and are never checked.
        let text = "'S1F1'\n<A[99] \"abc\">\n.";
        assert!(Decoder::with_options(StrLines::new(text), strict)
            .decode_message()
            .is_ok());
    }

    #[test]
    fn test_max_depth() {
        let options = SmlOptions::new().with_max_depth(1);
        let sml = "'S1F1'\n<L[1]\n<L[0]\n>\n>\n.";
        let err = Decoder::with_options(StrLines::new(sml), options)
            .decode_message()
            .unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_blank_lines() {
        let sml = "'S1F1'\n<L[1]\n\n   \n<A \"x\">\n>\n.";
        assert!(decode(sml).is_ok());

        let options = SmlOptions::new().with_skip_blank_lines(false);
        let err = Decoder::with_options(StrLines::new(sml), options)
            .decode_message()
            .unwrap_err();
        assert!(err.is_format());
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_reader_source_handles_crlf() {
        let input = "Ping:'S1F1' W\r\n<A \"x\">\r\n.\r\n";
        let mut decoder = Decoder::from_reader(Cursor::new(input));
        let msg = decoder.decode_message().unwrap();
        assert_eq!(msg.name, "Ping");
        assert_eq!(msg.body, Some(Item::from("x")));
        assert!(decoder.next_message().unwrap().is_none());
        assert_eq!(decoder.line(), 3);
    }

    #[test]
    fn test_reader_source_rejects_invalid_utf8() {
        let input: &[u8] = b"'S1F1'\n<A \"\xff\">\n.";
        let err = Decoder::from_reader(input).decode_message().unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_position_after_error_is_caller_managed() {
        let mut decoder = Decoder::from_str("'S1F1'\n<X[1] 1>\n.\n'S1F2'\n.\n");
        assert!(decoder.next_message().is_err());
        assert_eq!(decoder.line(), 2);

        // The rest of the broken message is garbage to a fresh decode; skipping the
        // stray terminator is left to the caller.
        assert!(decoder.next_message().is_err());
        let msg = decoder.decode_message().unwrap();
        assert_eq!(msg.function, 2);
    }
}
