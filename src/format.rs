//! SML format tags and the value coercion table.
//!
//! Every leaf item in SML names its type with a short tag (`U1`, `A`, `Boolean`, ...).
//! This module maps those tags onto [`SecsFormat`] and, for each format, onto the
//! three operations needed to turn value text into an [`Item`]:
//!
//! - an **empty constructor** used when the value region holds no tokens
//! - an **array constructor** taking the converted elements
//! - a **token parser** converting one whitespace-separated token
//!
//! The formats are plain data in [`TAGS`] and the `*_COERCION` constants; adding an
//! encoding means adding a table row, not a type.
//!
//! ## Examples
//!
//! ```rust
//! use secs_sml::format::parse_item;
//! use secs_sml::Item;
//!
//! let item = parse_item("B", " 0x1F 31 ", None).unwrap();
//! assert_eq!(item, Item::Binary(vec![31, 31]));
//!
//! let text = parse_item("A", " \"hello world\" ", None).unwrap();
//! assert_eq!(text.as_str(), Some("hello world"));
//! ```

use crate::error::NO_LINE;
use crate::{Error, Item, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on storage pre-allocated from a `[COUNT]` hint.
///
/// The hint comes from untrusted text; anything above this grows on demand.
pub const MAX_PREALLOCATION: usize = 4096;

/// The item formats that can appear in SML.
///
/// # Examples
///
/// ```rust
/// use secs_sml::SecsFormat;
///
/// assert_eq!(SecsFormat::from_sml_tag("Bool"), Some(SecsFormat::Boolean));
/// assert_eq!(SecsFormat::from_sml_tag("JIS8"), Some(SecsFormat::Jis8));
/// assert_eq!(SecsFormat::U4.sml_tag(), "U4");
/// assert_eq!(SecsFormat::from_sml_tag("X2"), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecsFormat {
    List,
    Binary,
    Boolean,
    Ascii,
    Jis8,
    I8,
    I1,
    I2,
    I4,
    F8,
    F4,
    U8,
    U1,
    U2,
    U4,
}

/// Every tag accepted in SML, aliases included.
pub const TAGS: &[(&str, SecsFormat)] = &[
    ("L", SecsFormat::List),
    ("A", SecsFormat::Ascii),
    ("J", SecsFormat::Jis8),
    ("JIS8", SecsFormat::Jis8),
    ("Bool", SecsFormat::Boolean),
    ("Boolean", SecsFormat::Boolean),
    ("B", SecsFormat::Binary),
    ("Binary", SecsFormat::Binary),
    ("I1", SecsFormat::I1),
    ("I2", SecsFormat::I2),
    ("I4", SecsFormat::I4),
    ("I8", SecsFormat::I8),
    ("U1", SecsFormat::U1),
    ("U2", SecsFormat::U2),
    ("U4", SecsFormat::U4),
    ("U8", SecsFormat::U8),
    ("F4", SecsFormat::F4),
    ("F8", SecsFormat::F8),
];

impl SecsFormat {
    /// Looks up a format by its SML tag. Tags are case-sensitive.
    #[must_use]
    pub fn from_sml_tag(tag: &str) -> Option<Self> {
        TAGS.iter()
            .find(|(candidate, _)| *candidate == tag)
            .map(|(_, format)| *format)
    }

    /// Returns the canonical SML tag for this format.
    #[must_use]
    pub const fn sml_tag(self) -> &'static str {
        match self {
            SecsFormat::List => "L",
            SecsFormat::Binary => "B",
            SecsFormat::Boolean => "Boolean",
            SecsFormat::Ascii => "A",
            SecsFormat::Jis8 => "JIS8",
            SecsFormat::I8 => "I8",
            SecsFormat::I1 => "I1",
            SecsFormat::I2 => "I2",
            SecsFormat::I4 => "I4",
            SecsFormat::F8 => "F8",
            SecsFormat::F4 => "F4",
            SecsFormat::U8 => "U8",
            SecsFormat::U1 => "U1",
            SecsFormat::U2 => "U2",
            SecsFormat::U4 => "U4",
        }
    }

    /// Returns `true` for the two text formats (`A` and `JIS8`).
    #[inline]
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, SecsFormat::Ascii | SecsFormat::Jis8)
    }

    #[inline]
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, SecsFormat::List)
    }

    /// Returns the leaf coercion for this format, or `None` for `List`.
    fn coercion(self) -> Option<Coercion> {
        let coercion = match self {
            SecsFormat::List => return None,
            SecsFormat::Ascii => Coercion::Text(&ASCII_COERCION),
            SecsFormat::Jis8 => Coercion::Text(&JIS8_COERCION),
            SecsFormat::Boolean => Coercion::Array(|v, h| coerce_array(v, h, &BOOLEAN_COERCION)),
            SecsFormat::Binary => Coercion::Array(|v, h| coerce_array(v, h, &BINARY_COERCION)),
            SecsFormat::I1 => Coercion::Array(|v, h| coerce_array(v, h, &I1_COERCION)),
            SecsFormat::I2 => Coercion::Array(|v, h| coerce_array(v, h, &I2_COERCION)),
            SecsFormat::I4 => Coercion::Array(|v, h| coerce_array(v, h, &I4_COERCION)),
            SecsFormat::I8 => Coercion::Array(|v, h| coerce_array(v, h, &I8_COERCION)),
            SecsFormat::U1 => Coercion::Array(|v, h| coerce_array(v, h, &U1_COERCION)),
            SecsFormat::U2 => Coercion::Array(|v, h| coerce_array(v, h, &U2_COERCION)),
            SecsFormat::U4 => Coercion::Array(|v, h| coerce_array(v, h, &U4_COERCION)),
            SecsFormat::U8 => Coercion::Array(|v, h| coerce_array(v, h, &U8_COERCION)),
            SecsFormat::F4 => Coercion::Array(|v, h| coerce_array(v, h, &F4_COERCION)),
            SecsFormat::F8 => Coercion::Array(|v, h| coerce_array(v, h, &F8_COERCION)),
        };
        Some(coercion)
    }
}

impl fmt::Display for SecsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sml_tag())
    }
}

/// Converts one token; the error string becomes the message of an [`Error::ValueParse`].
type TokenParser<T> = fn(&str) -> std::result::Result<T, String>;

/// Builds an array item from a value region and an optional capacity hint.
type ArrayCoercer = fn(&str, Option<usize>) -> std::result::Result<Item, TokenError>;

struct ArrayCoercion<T> {
    empty: fn() -> Item,
    create: fn(Vec<T>) -> Item,
    parse: TokenParser<T>,
}

struct TextCoercion {
    empty: fn() -> Item,
    create: fn(String) -> Item,
}

enum Coercion {
    Text(&'static TextCoercion),
    Array(ArrayCoercer),
}

/// A token that failed to convert, before it is tied to a tag and a line.
struct TokenError {
    token: String,
    msg: String,
}

const ASCII_COERCION: TextCoercion = TextCoercion {
    empty: || Item::Ascii(String::new()),
    create: Item::Ascii,
};
const JIS8_COERCION: TextCoercion = TextCoercion {
    empty: || Item::Jis8(String::new()),
    create: Item::Jis8,
};

const BOOLEAN_COERCION: ArrayCoercion<bool> = ArrayCoercion {
    empty: || Item::Boolean(Vec::new()),
    create: Item::Boolean,
    parse: parse_bool,
};
const BINARY_COERCION: ArrayCoercion<u8> = ArrayCoercion {
    empty: || Item::Binary(Vec::new()),
    create: Item::Binary,
    parse: parse_hex_byte,
};
const I1_COERCION: ArrayCoercion<i8> = ArrayCoercion {
    empty: || Item::I1(Vec::new()),
    create: Item::I1,
    parse: parse_number::<i8>,
};
const I2_COERCION: ArrayCoercion<i16> = ArrayCoercion {
    empty: || Item::I2(Vec::new()),
    create: Item::I2,
    parse: parse_number::<i16>,
};
const I4_COERCION: ArrayCoercion<i32> = ArrayCoercion {
    empty: || Item::I4(Vec::new()),
    create: Item::I4,
    parse: parse_number::<i32>,
};
const I8_COERCION: ArrayCoercion<i64> = ArrayCoercion {
    empty: || Item::I8(Vec::new()),
    create: Item::I8,
    parse: parse_number::<i64>,
};
const U1_COERCION: ArrayCoercion<u8> = ArrayCoercion {
    empty: || Item::U1(Vec::new()),
    create: Item::U1,
    parse: parse_number::<u8>,
};
const U2_COERCION: ArrayCoercion<u16> = ArrayCoercion {
    empty: || Item::U2(Vec::new()),
    create: Item::U2,
    parse: parse_number::<u16>,
};
const U4_COERCION: ArrayCoercion<u32> = ArrayCoercion {
    empty: || Item::U4(Vec::new()),
    create: Item::U4,
    parse: parse_number::<u32>,
};
const U8_COERCION: ArrayCoercion<u64> = ArrayCoercion {
    empty: || Item::U8(Vec::new()),
    create: Item::U8,
    parse: parse_number::<u64>,
};
const F4_COERCION: ArrayCoercion<f32> = ArrayCoercion {
    empty: || Item::F4(Vec::new()),
    create: Item::F4,
    parse: parse_number::<f32>,
};
const F8_COERCION: ArrayCoercion<f64> = ArrayCoercion {
    empty: || Item::F8(Vec::new()),
    create: Item::F8,
    parse: parse_number::<f64>,
};

/// Builds a leaf item from an SML format tag, its value region, and a capacity hint.
///
/// The hint only pre-sizes storage; it is never compared with the number of tokens.
/// Errors carry no line number ([`Error::line`] is `None`); the decoder fills in
/// the source line when it coerces an item line.
///
/// # Errors
///
/// - [`Error::UnknownFormat`] if `tag` is not recognized, or is `L`
///   (lists are built from an opener line and a closer line)
/// - [`Error::ValueParse`] if a token does not convert to the format's element type
///
/// # Examples
///
/// ```rust
/// use secs_sml::format::parse_item;
/// use secs_sml::Item;
///
/// assert_eq!(parse_item("U1", "1 2 255", Some(3)).unwrap(), Item::U1(vec![1, 2, 255]));
/// assert!(parse_item("U1", "256", Some(1)).unwrap_err().is_value_parse());
/// assert!(parse_item("L", "", None).unwrap_err().is_unknown_format());
/// ```
pub fn parse_item(tag: &str, value: &str, hint: Option<usize>) -> Result<Item> {
    let format =
        SecsFormat::from_sml_tag(tag).ok_or_else(|| Error::unknown_format(NO_LINE, tag))?;
    coerce(format, tag, value, hint)
}

/// Builds a leaf item of a known format. `tag` is only used in error messages.
pub(crate) fn coerce(
    format: SecsFormat,
    tag: &str,
    value: &str,
    hint: Option<usize>,
) -> Result<Item> {
    match format.coercion() {
        None => Err(Error::unknown_format(NO_LINE, tag)),
        Some(Coercion::Text(text)) => Ok(coerce_text(value, text)),
        Some(Coercion::Array(array)) => {
            array(value, hint).map_err(|e| Error::value_parse(NO_LINE, tag, &e.token, e.msg))
        }
    }
}

fn coerce_text(value: &str, coercion: &TextCoercion) -> Item {
    let text = value.trim_matches(|c| matches!(c, ' ' | '\'' | '"'));
    if text.is_empty() {
        (coercion.empty)()
    } else {
        (coercion.create)(text.to_string())
    }
}

fn coerce_array<T>(
    value: &str,
    hint: Option<usize>,
    coercion: &ArrayCoercion<T>,
) -> std::result::Result<Item, TokenError> {
    let mut tokens = tokens(value).peekable();
    if tokens.peek().is_none() {
        return Ok((coercion.empty)());
    }

    let mut elements = Vec::with_capacity(hint.unwrap_or(0).min(MAX_PREALLOCATION));
    for token in tokens {
        let element = (coercion.parse)(token).map_err(|msg| TokenError {
            token: token.to_string(),
            msg,
        })?;
        elements.push(element);
    }
    Ok((coercion.create)(elements))
}

/// Splits a value region on single spaces, dropping empty tokens.
pub fn tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split(' ').filter(|token| !token.is_empty())
}

fn parse_number<T>(token: &str) -> std::result::Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    token.parse::<T>().map_err(|e| e.to_string())
}

fn parse_bool(token: &str) -> std::result::Result<bool, String> {
    if token.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err("expected 'true' or 'false'".to_string())
    }
}

fn parse_hex_byte(token: &str) -> std::result::Result<u8, String> {
    match token.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => {
            u8::from_str_radix(&token[2..], 16).map_err(|e| e.to_string())
        }
        _ => parse_number::<u8>(token),
    }
}
