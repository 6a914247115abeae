//! Throughput benchmarks for the upstream decoder and frame encoder
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chat_relay::frames::encode_event;
use chat_relay::sse::SseDecoder;

/// Generate an upstream body of `deltas` text records plus a tool cycle
fn generate_upstream_body(deltas: usize) -> String {
    let mut body = String::from(
        "data: {\"type\":\"conversation_id\",\"data\":{\"conversation_id\":\"c-1\"}}\n\
         data: {\"type\":\"status_event\",\"data\":{\"status\":\"tool_started\",\"tool_name\":\"catalog_search\",\"message\":\"Searching \\\"widgets\\\"\"}}\n\
         data: {\"type\":\"run_item_stream_event\",\"data\":{\"item_type\":\"tool_call_output_item\",\"tool_name\":\"catalog_search\",\"output\":\"3 results\"}}\n",
    );
    for i in 0..deltas {
        body.push_str(&format!(
            "data: {{\"type\":\"raw_response_event\",\"data\":{{\"delta\":\"token {} \"}}}}\n",
            i
        ));
    }
    body.push_str("data: {\"type\":\"status_event\",\"data\":{\"status\":\"completed\"}}\n");
    body
}

/// Benchmark decoding with different network chunk sizes
fn bench_decode_chunked(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_chunked");
    let body = generate_upstream_body(500);
    group.throughput(Throughput::Bytes(body.len() as u64));

    for chunk_size in [16usize, 256, 4096].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(chunk_size),
            chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut decoder = SseDecoder::new();
                    let mut count = 0;
                    for chunk in body.as_bytes().chunks(chunk_size) {
                        count += decoder.feed(black_box(chunk)).len();
                    }
                    count
                });
            },
        );
    }

    group.finish();
}

/// Benchmark decode plus encode to wire lines
fn bench_decode_and_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_and_encode");

    for deltas in [10usize, 100, 1000].iter() {
        let body = generate_upstream_body(*deltas);
        group.throughput(Throughput::Elements(*deltas as u64));
        group.bench_with_input(BenchmarkId::from_parameter(deltas), &body, |b, body| {
            b.iter(|| {
                let mut decoder = SseDecoder::new();
                let mut bytes = 0;
                for event in decoder.feed(black_box(body.as_bytes())) {
                    for frame in encode_event(&event).frames {
                        bytes += frame.to_line().map(|l| l.len()).unwrap_or(0);
                    }
                }
                bytes
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode_chunked, bench_decode_and_encode);

criterion_main!(benches);
