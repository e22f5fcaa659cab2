//! Raster Operations Benchmarks
//!
//! Benchmarks for scene rasterization, Lanczos resizing and the
//! resolution-tagged encoders.
//!
//! Run with: `cargo bench --bench raster_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use figport::codec::{self, EncodeOptions};
use figport::raster::{self, ChannelLayout};
use figport::Figure;
use image::DynamicImage;

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterize");
    group.sample_size(20);

    let scene = Figure::sine_demo().scene();
    for dpi in [72.0, 100.0, 300.0] {
        group.bench_with_input(BenchmarkId::from_parameter(dpi), &dpi, |bench, &dpi| {
            bench.iter(|| {
                let image = raster::rasterize(black_box(&scene), dpi).unwrap();
                black_box(image);
            });
        });
    }

    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize_lanczos");
    group.sample_size(10);

    let natural = DynamicImage::ImageRgba8(raster::rasterize_natural(&Figure::sine_demo()).unwrap());
    for target in [150.0, 300.0] {
        let (w, h) = raster::scaled_dimensions((natural.width(), natural.height()), target, 100.0);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{w}x{h}")),
            &(w, h),
            |bench, &(w, h)| {
                bench.iter(|| black_box(raster::resize(black_box(&natural), w, h)));
            },
        );
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_tagged");

    let rgba = DynamicImage::ImageRgba8(raster::rasterize_natural(&Figure::sine_demo()).unwrap());
    let rgb = raster::convert_layout(rgba.clone(), ChannelLayout::Rgb);
    let options = EncodeOptions::default().with_dpi(300.0);

    group.bench_function("png", |bench| {
        bench.iter(|| black_box(codec::encode_png(black_box(&rgba), &options).unwrap()));
    });
    group.bench_function("jpeg", |bench| {
        bench.iter(|| black_box(codec::encode_jpeg(black_box(&rgb), &options).unwrap()));
    });
    group.bench_function("tiff", |bench| {
        bench.iter(|| black_box(codec::encode_tiff(black_box(&rgba), &options).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_rasterize, bench_resize, bench_encode);
criterion_main!(benches);
