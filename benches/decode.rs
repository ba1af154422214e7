use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use secs_sml::{from_str, messages_from_str};
use std::fmt::Write;

const EVENT_REPORT: &str = "\
EventReportSend:'S6F11' W
<L[3]
  <U4[1] 1>
  <U4[1] 4001>
  <L[1]
    <L[2]
      <U4[1] 100>
      <L[4]
        <A \"LOT-0001\">
        <Boolean[2] true false>
        <B[3] 0x00 0x1F 255>
        <F4[1] 23.5>
      >
    >
  >
>
.";

fn wide_message(items: usize) -> String {
    let mut sml = format!("Wide:'S6F11' W\n<L[{items}]\n");
    for i in 0..items {
        writeln!(sml, "  <U4[4] {i} {} {} {}>", i + 1, i + 2, i + 3).unwrap();
    }
    sml.push_str(">\n.\n");
    sml
}

fn benchmark_decode_event_report(c: &mut Criterion) {
    c.bench_function("decode_event_report", |b| {
        b.iter(|| from_str(black_box(EVENT_REPORT)))
    });
}

fn benchmark_decode_wide_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_wide_list");

    for size in [10, 100, 1000].iter() {
        let sml = wide_message(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &sml, |b, sml| {
            b.iter(|| from_str(black_box(sml)))
        });
    }

    group.finish();
}

fn benchmark_stream_log(c: &mut Criterion) {
    let log: String = std::iter::repeat(EVENT_REPORT)
        .take(200)
        .map(|msg| format!("{msg}\n"))
        .collect();

    c.bench_function("stream_200_messages", |b| {
        b.iter(|| messages_from_str(black_box(&log)).count())
    });
}

criterion_group!(
    benches,
    benchmark_decode_event_report,
    benchmark_decode_wide_list,
    benchmark_stream_log
);
criterion_main!(benches);
