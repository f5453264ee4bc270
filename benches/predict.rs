// Benchmark: full predict pipeline (scale -> ensemble walk -> top-3 rank)
// over the shipped model artifact.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use crop_advisor::CropClassifier;

fn bench_predict(c: &mut Criterion) {
    let classifier = CropClassifier::load("data/crop_model.json").expect("model artifact");
    let features = [90.0, 42.0, 43.0, 23.8, 85.0, 6.5, 220.0];

    c.bench_function("predict_top3", |b| {
        b.iter(|| classifier.predict(black_box(&features)).unwrap())
    });
}

criterion_group!(benches, bench_predict);
criterion_main!(benches);
