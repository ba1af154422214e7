//! Header line parsing.
//!
//! The first line of every SML message names it and gives its stream/function pair:
//!
//! ```text
//! EventReport:'S6F11' W
//! ```
//!
//! The name is optional, and `W` marks a message that expects a reply.

use crate::error::NO_LINE;
use crate::{Error, Result};

/// The fields carried by a header line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    pub name: String,
    pub stream: u8,
    pub function: u8,
    pub reply_expected: bool,
}

/// Parses a header line of the form `[name]:'S<digits>F<digits>[ W]'`.
///
/// Errors carry no line number ([`Error::line`] is `None`); the decoder fills in
/// the source line when it parses a header.
///
/// # Errors
///
/// - [`Error::Format`] if the `'S` marker, the `F` separator, or the closing quote is missing
/// - [`Error::ValueParse`] if the stream or function is not a byte value
///
/// # Examples
///
/// ```rust
/// use secs_sml::header::parse_header;
///
/// let header = parse_header("name:'S6F11 W'").unwrap();
/// assert_eq!(header.name, "name");
/// assert_eq!((header.stream, header.function), (6, 11));
/// assert!(header.reply_expected);
///
/// let header = parse_header("'S1F2'").unwrap();
/// assert_eq!(header.name, "");
/// assert!(!header.reply_expected);
/// ```
pub fn parse_header(line: &str) -> Result<MessageHeader> {
    let marker = line
        .find("'S")
        .ok_or_else(|| Error::format(NO_LINE, "missing 'S marker in message header"))?;

    // A colon only separates the name when it precedes the marker.
    let name = match line[..marker].find(':') {
        Some(colon) => line[..colon].trim(),
        None => "",
    };

    let stream_and_function = &line[marker + 2..];
    let separator = stream_and_function
        .find('F')
        .ok_or_else(|| Error::format(NO_LINE, "missing 'F' separator in message header"))?;
    let stream = parse_byte_field("stream", &stream_and_function[..separator])?;

    let rest = &stream_and_function[separator + 1..];
    let quote = rest
        .find('\'')
        .ok_or_else(|| Error::format(NO_LINE, "missing closing quote in message header"))?;
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    // Only whitespace and the reply marker may sit between the function and the quote.
    let between = &rest[digits..quote];
    if !between.chars().all(|c| c.is_whitespace() || c == 'W') {
        return Err(Error::value_parse(
            NO_LINE,
            "function",
            rest[..quote].trim(),
            "invalid digit found in string",
        ));
    }
    let function = parse_byte_field("function", &rest[..digits])?;

    Ok(MessageHeader {
        name: name.to_string(),
        stream,
        function,
        reply_expected: rest[digits..].contains('W'),
    })
}

fn parse_byte_field(field: &str, text: &str) -> Result<u8> {
    let text = text.trim();
    text.parse::<u8>()
        .map_err(|e| Error::value_parse(NO_LINE, field, text, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_stream_function_reply() {
        let header = parse_header("name:'S6F11 W'").unwrap();
        assert_eq!(
            header,
            MessageHeader {
                name: "name".to_string(),
                stream: 6,
                function: 11,
                reply_expected: true,
            }
        );
    }

    #[test]
    fn test_reply_marker_outside_quotes() {
        let header = parse_header("EventReport:'S6F11' W").unwrap();
        assert!(header.reply_expected);
        assert_eq!(header.function, 11);
    }

    #[test]
    fn test_without_reply_marker() {
        let header = parse_header("name:'S6F11'").unwrap();
        assert!(!header.reply_expected);
    }

    #[test]
    fn test_missing_or_empty_name() {
        assert_eq!(parse_header("'S1F1' W").unwrap().name, "");
        assert_eq!(parse_header(":'S1F1' W").unwrap().name, "");
    }

    #[test]
    fn test_colon_after_marker_is_not_a_name() {
        let header = parse_header("'S1F1' W :trailing").unwrap();
        assert_eq!(header.name, "");
        assert!(header.reply_expected);
    }

    #[test]
    fn test_byte_range() {
        let header = parse_header("'S255F255'").unwrap();
        assert_eq!((header.stream, header.function), (255, 255));

        assert!(parse_header("'S256F1'").unwrap_err().is_value_parse());
        assert!(parse_header("'S1F256'").unwrap_err().is_value_parse());
        assert!(parse_header("'SxF1'").unwrap_err().is_value_parse());
        assert!(parse_header("'S1F'").unwrap_err().is_value_parse());
        assert!(parse_header("'S1F1x'").unwrap_err().is_value_parse());
    }

    #[test]
    fn test_errors_have_no_line() {
        assert_eq!(parse_header("S1F1").unwrap_err().line(), None);
        assert_eq!(parse_header("'S1F999'").unwrap_err().line(), None);
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(parse_header("  Are You There :'S1F1' W").unwrap().name, "Are You There");
    }

    #[test]
    fn test_missing_delimiters() {
        assert!(parse_header("S1F1 W").unwrap_err().is_format());
        assert!(parse_header("'S1 W'").unwrap_err().is_format());
        assert!(parse_header("'S1F1 W").unwrap_err().is_format());
        assert!(parse_header("").unwrap_err().is_format());
    }
}
