//! The typed item tree decoded from SML.
//!
//! An [`Item`] is either a list of child items or a fixed-width typed array.
//! Text formats hold a single string instead of an array.
//!
//! ## Creating Items
//!
//! ```rust
//! use secs_sml::{item, Item};
//!
//! let tree = Item::list([Item::from("x"), Item::U1(vec![1, 2, 255])]);
//! assert_eq!(tree, item!(L [item!(A "x"), item!(U1 [1, 2, 255])]));
//! ```
//!
//! ## Inspecting Items
//!
//! ```rust
//! use secs_sml::{Item, SecsFormat};
//!
//! let item = Item::U2(vec![10, 20]);
//! assert_eq!(item.format(), SecsFormat::U2);
//! assert_eq!(item.len(), 2);
//! assert_eq!(item.as_u2(), Some(&[10, 20][..]));
//! assert_eq!(item.as_list(), None);
//! ```

use crate::SecsFormat;
use serde::{Deserialize, Serialize};

/// A node of a SECS-II message body.
///
/// Element width is fixed by the variant, so one item never mixes widths.
/// `Ascii(String::new())` is a present, empty text value; an absent body is
/// represented by `None` on [`SecsMessage::body`](crate::SecsMessage::body).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Item {
    List(Vec<Item>),
    Ascii(String),
    Jis8(String),
    Boolean(Vec<bool>),
    Binary(Vec<u8>),
    I1(Vec<i8>),
    I2(Vec<i16>),
    I4(Vec<i32>),
    I8(Vec<i64>),
    U1(Vec<u8>),
    U2(Vec<u16>),
    U4(Vec<u32>),
    U8(Vec<u64>),
    F4(Vec<f32>),
    F8(Vec<f64>),
}

macro_rules! slice_accessors {
    ($($(#[$doc:meta])* $name:ident => $variant:ident: $ty:ty;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            #[must_use]
            pub fn $name(&self) -> Option<&[$ty]> {
                match self {
                    Item::$variant(values) => Some(values.as_slice()),
                    _ => None,
                }
            }
        )*
    };
}

impl Item {
    /// Builds a list from an ordered, possibly empty, sequence of children.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secs_sml::Item;
    ///
    /// assert_eq!(Item::list(Vec::new()), Item::List(vec![]));
    /// assert_eq!(Item::list([Item::from(true)]).len(), 1);
    /// ```
    #[must_use]
    pub fn list<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Item>,
    {
        Item::List(children.into_iter().collect())
    }

    /// Returns the SML format of this item.
    #[must_use]
    pub const fn format(&self) -> SecsFormat {
        match self {
            Item::List(_) => SecsFormat::List,
            Item::Ascii(_) => SecsFormat::Ascii,
            Item::Jis8(_) => SecsFormat::Jis8,
            Item::Boolean(_) => SecsFormat::Boolean,
            Item::Binary(_) => SecsFormat::Binary,
            Item::I1(_) => SecsFormat::I1,
            Item::I2(_) => SecsFormat::I2,
            Item::I4(_) => SecsFormat::I4,
            Item::I8(_) => SecsFormat::I8,
            Item::U1(_) => SecsFormat::U1,
            Item::U2(_) => SecsFormat::U2,
            Item::U4(_) => SecsFormat::U4,
            Item::U8(_) => SecsFormat::U8,
            Item::F4(_) => SecsFormat::F4,
            Item::F8(_) => SecsFormat::F8,
        }
    }

    /// Returns the number of children, elements, or text bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Item::List(children) => children.len(),
            Item::Ascii(text) | Item::Jis8(text) => text.len(),
            Item::Boolean(values) => values.len(),
            Item::Binary(values) | Item::U1(values) => values.len(),
            Item::I1(values) => values.len(),
            Item::I2(values) => values.len(),
            Item::I4(values) => values.len(),
            Item::I8(values) => values.len(),
            Item::U2(values) => values.len(),
            Item::U4(values) => values.len(),
            Item::U8(values) => values.len(),
            Item::F4(values) => values.len(),
            Item::F8(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Item::List(_))
    }

    /// Returns the children if this is a list.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Item]> {
        match self {
            Item::List(children) => Some(children.as_slice()),
            _ => None,
        }
    }

    /// Returns the text if this is an `A` or `JIS8` item.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Item::Ascii(text) | Item::Jis8(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the `index`-th child of a list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use secs_sml::Item;
    ///
    /// let tree = Item::list([Item::from("a"), Item::from("b")]);
    /// assert_eq!(tree.get(1).and_then(Item::as_str), Some("b"));
    /// assert!(tree.get(2).is_none());
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.as_list().and_then(|children| children.get(index))
    }

    slice_accessors! {
        as_booleans => Boolean: bool;
        as_binary => Binary: u8;
        as_i1 => I1: i8;
        as_i2 => I2: i16;
        as_i4 => I4: i32;
        as_i8 => I8: i64;
        as_u1 => U1: u8;
        as_u2 => U2: u16;
        as_u4 => U4: u32;
        as_u8 => U8: u64;
        as_f4 => F4: f32;
        as_f8 => F8: f64;
    }

    /// Consumes the item and returns its children if it is a list.
    #[must_use]
    pub fn into_list(mut self) -> Option<Vec<Item>> {
        match &mut self {
            Item::List(children) => Some(std::mem::take(children)),
            _ => None,
        }
    }
}

/// Tears a tree down with a heap work-list, so dropping a deeply nested tree
/// does not use one stack frame per level.
impl Drop for Item {
    fn drop(&mut self) {
        let Item::List(children) = self else {
            return;
        };
        if !children.iter().any(Item::is_list) {
            return;
        }
        let mut pending = std::mem::take(children);
        while let Some(mut item) = pending.pop() {
            if let Item::List(grandchildren) = &mut item {
                pending.append(grandchildren);
            }
        }
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Self {
        Item::Ascii(s.to_string())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Self {
        Item::Ascii(s)
    }
}

impl From<bool> for Item {
    fn from(b: bool) -> Self {
        Item::Boolean(vec![b])
    }
}

impl From<Vec<Item>> for Item {
    fn from(children: Vec<Item>) -> Self {
        Item::List(children)
    }
}

// `Vec<u8>` is deliberately absent: it is ambiguous between `B` and `U1`.
macro_rules! from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for Item {
                fn from(values: Vec<$ty>) -> Self {
                    Item::$variant(values)
                }
            }
        )*
    };
}

from_vec! {
    bool => Boolean,
    i8 => I1,
    i16 => I2,
    i32 => I4,
    i64 => I8,
    u16 => U2,
    u32 => U4,
    u64 => U8,
    f32 => F4,
    f64 => F8,
}
