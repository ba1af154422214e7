//! Streaming many messages from one source.
//!
//! [`Messages`] turns a [`Decoder`] into an iterator that decodes one message per
//! step, in source order, until the source runs out or a message fails. It is
//! bound to the read position of its source and cannot be restarted.
//!
//! With the `async` feature, [`AsyncDecoder`] does the same over a
//! `tokio::io::AsyncBufRead`, suspending only while a line is being read.
//!
//! ## Examples
//!
//! ```rust
//! use secs_sml::messages_from_str;
//!
//! let log = "\
//! 'S1F1' W
//! .
//! 'S1F2'
//! <L[0]
//! >
//! .
//! ";
//! let functions: Vec<u8> = messages_from_str(log)
//!     .map(|msg| msg.map(|m| m.function))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(functions, vec![1, 2]);
//! ```

use crate::de::{Decoder, LineSource};
use crate::{Result, SecsMessage};
use std::iter::FusedIterator;

/// An iterator over the messages of a line source.
///
/// The iterator ends after the first `Err`: the source is then somewhere inside
/// the failed message, and what to skip is up to the caller. To resume, take the
/// decoder back with [`Messages::into_decoder`], advance its source past the
/// damage, and call [`Decoder::into_messages`] again.
///
/// # Examples
///
/// ```rust
/// use secs_sml::messages_from_str;
///
/// let log = "'S1F1'\n<U1[1] 300>\n.\n'S1F3'\n.\n";
/// let mut messages = messages_from_str(log);
/// assert!(messages.next().unwrap().is_err());
/// assert!(messages.next().is_none());
///
/// // Resume on the line after the failure: the stray `.` closes the broken message.
/// let mut rest = messages.into_decoder().into_messages();
/// assert!(rest.next().unwrap().is_err());
/// let mut rest = rest.into_decoder().into_messages();
/// assert_eq!(rest.next().unwrap().unwrap().function, 3);
/// ```
pub struct Messages<S> {
    decoder: Decoder<S>,
    failed: bool,
}

impl<S: LineSource> Messages<S> {
    pub fn new(decoder: Decoder<S>) -> Self {
        Messages {
            decoder,
            failed: false,
        }
    }

    /// Borrow the underlying decoder.
    pub fn decoder(&self) -> &Decoder<S> {
        &self.decoder
    }

    /// Consume the iterator and return the decoder at its current position.
    pub fn into_decoder(self) -> Decoder<S> {
        self.decoder
    }
}

impl<S: LineSource> Iterator for Messages<S> {
    type Item = Result<SecsMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.decoder.next_message().transpose();
        self.failed = matches!(next, Some(Err(_)));
        next
    }
}

impl<S: LineSource> FusedIterator for Messages<S> {}

impl<S: LineSource> Decoder<S> {
    /// Turns the decoder into an iterator over the remaining messages.
    pub fn into_messages(self) -> Messages<S> {
        Messages::new(self)
    }
}

#[cfg(feature = "async")]
pub use self::nonblocking::AsyncDecoder;

#[cfg(feature = "async")]
mod nonblocking {
    use crate::de::{trim_line_ending, MessageParser};
    use crate::{Result, SecsMessage, SmlOptions};
    use futures_util::stream::{self, Stream};
    use tokio::io::{AsyncBufRead, AsyncBufReadExt};

    /// Decodes SML messages from an async line source.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # tokio_test_block(async {
    /// use secs_sml::AsyncDecoder;
    ///
    /// let input: &[u8] = b"'S1F1' W\n.\n";
    /// let mut decoder = AsyncDecoder::new(input);
    /// let msg = decoder.next_message().await.unwrap().unwrap();
    /// assert!(msg.reply_expected);
    /// # });
    /// # fn tokio_test_block<F: std::future::Future>(f: F) {
    /// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
    /// # }
    /// ```
    pub struct AsyncDecoder<R> {
        reader: R,
        buf: String,
        options: SmlOptions,
        line: usize,
    }

    impl<R: AsyncBufRead + Unpin> AsyncDecoder<R> {
        pub fn new(reader: R) -> Self {
            Self::with_options(reader, SmlOptions::default())
        }

        pub fn with_options(reader: R, options: SmlOptions) -> Self {
            AsyncDecoder {
                reader,
                buf: String::new(),
                options,
                line: 0,
            }
        }

        /// Number of lines consumed so far.
        pub fn line(&self) -> usize {
            self.line
        }

        /// Consume the decoder and return the reader at its current position.
        pub fn into_inner(self) -> R {
            self.reader
        }

        /// Decodes the next message, or returns `None` if only blank lines remain.
        ///
        /// # Errors
        ///
        /// The same errors as [`Decoder::next_message`](crate::Decoder::next_message).
        pub async fn next_message(&mut self) -> Result<Option<SecsMessage>> {
            let mut parser = MessageParser::new(&self.options);
            loop {
                self.buf.clear();
                if self.reader.read_line(&mut self.buf).await? == 0 {
                    return parser.finish(self.line);
                }
                self.line += 1;
                if let Some(message) = parser.feed(trim_line_ending(&self.buf), self.line)? {
                    return Ok(Some(message));
                }
            }
        }

        /// Turns the decoder into a stream of the remaining messages.
        ///
        /// Like [`Messages`](crate::Messages), the stream ends after the first `Err`.
        pub fn into_stream(self) -> impl Stream<Item = Result<SecsMessage>> {
            stream::unfold(Some(self), |state| async move {
                let Some(mut decoder) = state else {
                    return None;
                };
                match decoder.next_message().await {
                    Ok(Some(message)) => Some((Ok(message), Some(decoder))),
                    Ok(None) => None,
                    Err(err) => Some((Err(err), None)),
                }
            })
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Item, SmlOptions};
    use crate::de::StrLines;

    #[test]
    fn test_yields_messages_in_order() {
        let log = "A:'S1F1' W\n.\nB:'S1F2'\n<A \"x\">\n.\nC:'S2F13' W\n<L[0]\n>\n.\n";
        let names: Vec<String> = Decoder::from_str(log)
            .into_messages()
            .map(|m| m.unwrap().name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        assert_eq!(Decoder::from_str("").into_messages().count(), 0);
        assert_eq!(Decoder::from_str("\n\n").into_messages().count(), 0);
    }

    #[test]
    fn test_error_ends_iteration() {
        let log = "'S1F1'\n<L[1]\n<U1[1] 300>\n>\n.\n'S1F3'\n.\n";
        let mut messages = Decoder::from_str(log).into_messages();
        let err = messages.next().unwrap().unwrap_err();
        assert!(err.is_value_parse());
        assert_eq!(err.line(), Some(3));
        assert!(messages.next().is_none());
        assert!(messages.next().is_none());
        assert_eq!(messages.decoder().line(), 3);
    }

    #[test]
    fn test_resume_after_error_from_decoder() {
        let log = "'S1F1'\n<U1[1] 300>\n'S1F3'\n.\n";
        let mut messages = Decoder::from_str(log).into_messages();
        assert!(messages.next().unwrap().unwrap_err().is_value_parse());

        // The source resumes after the failing line.
        let next = messages.into_decoder().into_messages().next().unwrap().unwrap();
        assert_eq!(next.function, 3);
    }

    #[test]
    fn test_options_carry_over_every_message() {
        let log = "'S1F1'\n<U1[2] 1>\n.\n";
        let decoder = Decoder::with_options(StrLines::new(log), SmlOptions::strict());
        let results: Vec<_> = decoder.into_messages().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].as_ref().unwrap_err().is_structural());
    }

    #[test]
    fn test_messages_are_independent() {
        let log = "'S1F1'\n<L[1]\n<A \"x\">\n>\n.\n'S1F1'\n<A \"y\">\n.\n";
        let bodies: Vec<Option<Item>> = Decoder::from_str(log)
            .into_messages()
            .map(|m| m.unwrap().body)
            .collect();
        assert_eq!(
            bodies,
            vec![
                Some(Item::list([Item::from("x")])),
                Some(Item::from("y")),
            ]
        );
    }
}
