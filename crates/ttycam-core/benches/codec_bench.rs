//! Criterion benchmarks for the run-length codec and the chunking path.
//!
//! Run with:
//! ```bash
//! cargo bench --package ttycam-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ttycam_core::{chunk_frame_data, decode_frame, encode_frame, CharFrame, Reassembler};

// ── Frame fixtures ────────────────────────────────────────────────────────────

/// A frame with long uniform runs (best case for RLE).
fn make_uniform_frame(cols: usize, rows: usize) -> CharFrame {
    CharFrame::new(vec![vec!['#'; cols]; rows])
}

/// A frame alternating per cell (worst case: one pair per cell).
fn make_noisy_frame(cols: usize, rows: usize) -> CharFrame {
    let rows = (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| if (r + c) % 2 == 0 { '#' } else { '.' })
                .collect()
        })
        .collect();
    CharFrame::new(rows)
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("rle_encode");
    for (name, frame) in [
        ("uniform_200x60", make_uniform_frame(200, 60)),
        ("noisy_200x60", make_noisy_frame(200, 60)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &frame, |b, f| {
            b.iter(|| encode_frame(black_box(f)));
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("rle_decode");
    for (name, frame) in [
        ("uniform_200x60", make_uniform_frame(200, 60)),
        ("noisy_200x60", make_noisy_frame(200, 60)),
    ] {
        let encoded = encode_frame(&frame);
        group.bench_with_input(BenchmarkId::from_parameter(name), &encoded, |b, e| {
            b.iter(|| decode_frame(black_box(e)));
        });
    }
    group.finish();
}

fn bench_chunk_and_reassemble(c: &mut Criterion) {
    let encoded = encode_frame(&make_noisy_frame(200, 60));

    c.bench_function("chunk_frame_data_256", |b| {
        b.iter(|| chunk_frame_data(black_box(&encoded), 256, 1));
    });

    let datagrams: Vec<Vec<u8>> = chunk_frame_data(&encoded, 256, 1)
        .iter()
        .map(|chunk| chunk.encode())
        .collect();
    c.bench_function("reassemble_full_frame", |b| {
        b.iter(|| {
            let mut reassembler = Reassembler::new();
            let mut out = None;
            for datagram in &datagrams {
                out = reassembler.catch(black_box(datagram)).unwrap();
            }
            out
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_chunk_and_reassemble);
criterion_main!(benches);
