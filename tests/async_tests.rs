#![cfg(feature = "async")]

use futures_util::StreamExt;
use secs_sml::{AsyncDecoder, Item, SmlOptions};

const LOG: &str = "\
AreYouThere:'S1F1' W
.
OnLineData:'S1F2'
<L[2]
  <A \"MDLN\">
  <A \"1.0\">
>
.
";

#[tokio::test]
async fn test_async_decoder_reads_each_message() {
    let mut decoder = AsyncDecoder::new(LOG.as_bytes());

    let first = decoder.next_message().await.unwrap().unwrap();
    assert_eq!(first.name, "AreYouThere");
    assert_eq!(first.body, None);

    let second = decoder.next_message().await.unwrap().unwrap();
    assert_eq!(
        second.body,
        Some(Item::list([Item::from("MDLN"), Item::from("1.0")]))
    );

    assert!(decoder.next_message().await.unwrap().is_none());
    assert_eq!(decoder.line(), 8);
}

#[tokio::test]
async fn test_async_stream_matches_blocking_iterator() {
    let streamed: Vec<_> = AsyncDecoder::new(LOG.as_bytes())
        .into_stream()
        .map(|m| m.unwrap())
        .collect()
        .await;
    let blocking: Vec<_> = secs_sml::messages_from_str(LOG)
        .map(|m| m.unwrap())
        .collect();
    assert_eq!(streamed, blocking);
}

#[tokio::test]
async fn test_async_decoder_honors_options() {
    let sml = "'S1F1'\n<U1[2] 1>\n.\n";
    let mut decoder = AsyncDecoder::with_options(sml.as_bytes(), SmlOptions::strict());
    let err = decoder.next_message().await.unwrap_err();
    assert!(err.is_structural());
    assert_eq!(err.line(), Some(2));
}
