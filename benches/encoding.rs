use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qrenc::{encode, ECLevel, QRBuilder};

fn bench_encode_minimum(c: &mut Criterion) {
    c.bench_function("encode_v1_hello", |b| {
        b.iter(|| encode(black_box(b"HELLO WORLD"), black_box(ECLevel::M)))
    });
}

fn bench_encode_url(c: &mut Criterion) {
    let url = b"https://www.example.org/articles/2024/qr-codes?utm_source=bench&id=42";
    c.bench_function("encode_url_q", |b| b.iter(|| encode(black_box(url), black_box(ECLevel::Q))));
    c.bench_function("encode_url_q_optimized", |b| {
        b.iter(|| QRBuilder::new(black_box(url)).ec_level(ECLevel::Q).optimize(true).build())
    });
}

fn bench_encode_maximum(c: &mut Criterion) {
    let data = "1234567890".repeat(305);
    c.bench_function("encode_v40_h_numeric", |b| {
        b.iter(|| encode(black_box(data.as_bytes()), black_box(ECLevel::H)))
    });
    let data = "a".repeat(2953);
    c.bench_function("encode_v40_l_bytes", |b| {
        b.iter(|| encode(black_box(data.as_bytes()), black_box(ECLevel::L)))
    });
}

criterion_group!(benches, bench_encode_minimum, bench_encode_url, bench_encode_maximum);
criterion_main!(benches);
