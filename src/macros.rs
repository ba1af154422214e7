/// Builds an [`Item`](crate::Item) tree with SML-like syntax.
///
/// Each invocation builds one item; lists take their children as nested expressions.
///
/// # Examples
///
/// ```rust
/// use secs_sml::{item, Item};
///
/// let tree = item!(L [
///     item!(A "PPID-7"),
///     item!(U4 [1, 2, 3]),
///     item!(L []),
/// ]);
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.get(0), Some(&Item::from("PPID-7")));
/// assert_eq!(tree.get(2), Some(&Item::List(vec![])));
/// ```
#[macro_export]
macro_rules! item {
    (L [ $($child:expr),* $(,)? ]) => {
        $crate::Item::List(vec![$($child),*])
    };

    (A $text:expr) => {
        $crate::Item::Ascii(::std::string::String::from($text))
    };

    (J $text:expr) => {
        $crate::Item::Jis8(::std::string::String::from($text))
    };

    (Boolean [ $($v:expr),* $(,)? ]) => {
        $crate::Item::Boolean(vec![$($v),*])
    };

    (B [ $($v:expr),* $(,)? ]) => {
        $crate::Item::Binary(vec![$($v),*])
    };

    // Numeric arrays
    ($variant:ident [ $($v:expr),* $(,)? ]) => {
        $crate::Item::$variant(vec![$($v),*])
    };
}
