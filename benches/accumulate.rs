use criterion::{black_box, criterion_group, criterion_main, Criterion};
use long_exposure::{
    capture::{CaptureConfig, FrameSource, MockSource},
    effects::{edge_filter, sharpen},
    exposure::{Accumulator, BlendPolicy, ExposureConfig},
};

fn source_frames(count: usize) -> Vec<long_exposure::Frame> {
    let mut source = MockSource::new();
    source
        .open(&CaptureConfig::with_dimensions(320, 240))
        .unwrap();
    (0..count).map(|_| source.capture().unwrap()).collect()
}

fn bench_accumulate(c: &mut Criterion) {
    let frames = source_frames(40);

    for policy in [BlendPolicy::FixedWeight, BlendPolicy::DistanceScaled] {
        c.bench_function(&format!("accumulate_320x240_{:?}", policy), |b| {
            let mut acc = Accumulator::new(ExposureConfig {
                blend_policy: policy,
                ..Default::default()
            })
            .unwrap();
            let mut i = 0;
            b.iter(|| {
                let frame = frames[i % frames.len()].clone();
                i += 1;
                black_box(acc.accumulate(frame).unwrap())
            });
        });
    }
}

fn bench_filters(c: &mut Criterion) {
    let frame = source_frames(1).remove(0);

    c.bench_function("edge_filter_320x240", |b| {
        b.iter(|| black_box(edge_filter(black_box(&frame))))
    });
    c.bench_function("sharpen_320x240", |b| {
        b.iter(|| black_box(sharpen(black_box(&frame))))
    });
}

criterion_group!(benches, bench_accumulate, bench_filters);
criterion_main!(benches);
