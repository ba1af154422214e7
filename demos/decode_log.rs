//! Decode every message in an SML log and print a one-line summary of each.
//!
//! Reads the file named on the command line, or a built-in sample log.
//!
//! Run with: `cargo run --example decode_log [path]`

use secs_sml::{messages_from_reader, Item, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};

const SAMPLE: &str = "\
AreYouThere:'S1F1' W
.
OnLineData:'S1F2'
<L[2]
  <A \"MDLN\">
  <A \"1.0.3\">
>
.
EventReportSend:'S6F11' W
<L[3]
  <U4[1] 1>
  <U4[1] 4001>
  <L[0]
  >
>
.
";

fn count_items(item: &Item) -> usize {
    1 + item.as_list().map_or(0, |children| children.iter().map(count_items).sum())
}

fn main() -> Result<()> {
    let reader: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(Cursor::new(SAMPLE)),
    };

    for message in messages_from_reader(reader) {
        let message = message?;
        let reply = if message.reply_expected { " W" } else { "" };
        let items = message.body.as_ref().map_or(0, count_items);
        println!(
            "{:<24} S{}F{}{:<2}  {} item(s)",
            message.name, message.stream, message.function, reply, items
        );
    }

    Ok(())
}
