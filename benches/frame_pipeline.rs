use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{Rgb, RgbImage};
use monodepth_rt::depth_pipeline::{
    ColorCurve, Compositor, CropPolicy, DepthMap, DepthRange, Preprocessor, TensorShape, colorize,
};

fn generate_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn generate_depth(height: usize, width: usize) -> DepthMap {
    let data = (0..height * width)
        .map(|i| (i % width) as f32 / width as f32 * 10.0)
        .collect();
    DepthMap {
        width,
        height,
        data,
    }
}

fn benchmark_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess");

    let cases = vec![
        ("kitti_1080p", (1920, 1080), TensorShape::new(3, 352, 1216), CropPolicy::kitti()),
        ("kitti_4k", (3840, 2160), TensorShape::new(3, 352, 1216), CropPolicy::kitti()),
        ("nyu_vga", (640, 480), TensorShape::new(3, 480, 640), CropPolicy::None),
    ];

    for (label, (width, height), shape, crop) in cases {
        let frame = generate_frame(width, height);
        let preprocessor = Preprocessor::new(shape, crop).expect("valid target shape");

        group.bench_with_input(BenchmarkId::from_parameter(label), &frame, |b, frame| {
            b.iter(|| preprocessor.preprocess(black_box(frame)));
        });
    }

    group.finish();
}

fn benchmark_colorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("colorize");
    let depth = generate_depth(352, 1216);

    for curve in [ColorCurve::Inferno, ColorCurve::Viridis, ColorCurve::Gray] {
        group.bench_with_input(BenchmarkId::from_parameter(curve), &depth, |b, depth| {
            b.iter(|| colorize(black_box(depth), DepthRange::default(), curve));
        });
    }

    group.finish();
}

fn benchmark_composite(c: &mut Criterion) {
    let source = generate_frame(1216, 352);
    let depth = colorize(&generate_depth(352, 1216), DepthRange::default(), ColorCurve::Inferno);
    let compositor = Compositor::new().expect("bundled font");

    c.bench_function("composite_kitti", |b| {
        b.iter(|| compositor.compose(black_box(&source), black_box(&depth), Some(30.0)));
    });
}

criterion_group!(benches, benchmark_preprocess, benchmark_colorize, benchmark_composite);
criterion_main!(benches);
