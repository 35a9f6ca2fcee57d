use criterion::{criterion_group, criterion_main, Criterion};

use mailseal::codec::compress::{compress, decompress, DEFAULT_LEVEL};
use mailseal::codec::envelope;
use mailseal::model::Metadata;

fn bench_compress_round_trip(c: &mut Criterion) {
    // Patterned 256 KiB buffer: compressible, like recorder output.
    let data: Vec<u8> = (0..256 * 1024).map(|i| (i % 251) as u8).collect();

    c.bench_function("compress_256k", |b| {
        b.iter(|| compress(&data, DEFAULT_LEVEL))
    });

    let encoded = compress(&data, DEFAULT_LEVEL);
    c.bench_function("decompress_256k", |b| {
        b.iter(|| decompress(&encoded, mailseal::error::BlockKind::File).unwrap())
    });
}

fn bench_envelope_extract(c: &mut Criterion) {
    let mut metadata = Metadata::new();
    metadata.insert("Encryption".into(), "AES-256".into());
    metadata.insert("Timestamp".into(), "2026-08-30T08:15:00Z".into());
    let payload = "QUJD".repeat(20_000);
    let body = format!(
        "quoted reply text\n> older stuff\n\n{}\n\nsignature",
        envelope::build(&metadata, &payload, 76)
    );

    c.bench_function("envelope_extract_80k_payload", |b| {
        b.iter(|| envelope::extract(&body).unwrap())
    });
}

criterion_group!(benches, bench_compress_round_trip, bench_envelope_extract);
criterion_main!(benches);
