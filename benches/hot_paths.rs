use choropleth_tui::braille::BrailleCanvas;
use choropleth_tui::data::{sample_world, Metric};
use choropleth_tui::layer::resolve_values;
use choropleth_tui::map::geometry::fill_path;
use choropleth_tui::map::{PathGenerator, Viewport};
use choropleth_tui::scale::{quantile, ColorScale, Domain, Rgb};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_project_paths(c: &mut Criterion) {
    let (features, _) = sample_world();
    let vp = Viewport::new(0.0, 20.0, 2.0, 400, 240);
    let generator = PathGenerator::new(|lon, lat| vp.project_f(lon, lat));

    c.bench_function("project_sample_world", |b| {
        b.iter(|| {
            for feature in &features.features {
                black_box(generator.path(feature.geometry.as_ref()));
            }
        })
    });
}

fn bench_fill(c: &mut Criterion) {
    let (features, _) = sample_world();
    let vp = Viewport::world(400, 240);
    let generator = PathGenerator::new(|lon, lat| vp.project_f(lon, lat));
    let paths: Vec<_> = features
        .features
        .iter()
        .map(|f| generator.path(f.geometry.as_ref()))
        .collect();

    c.bench_function("fill_sample_world", |b| {
        b.iter(|| {
            let mut canvas = BrailleCanvas::new(200, 60);
            for path in &paths {
                fill_path(&mut canvas, path, Rgb(200, 80, 40), (0.0, 0.0));
            }
            black_box(canvas)
        })
    });
}

fn bench_scale(c: &mut Criterion) {
    let sorted: Vec<f64> = (0..10_000).map(|i| i as f64 * 1.7).collect();
    c.bench_function("quantile_10k", |b| b.iter(|| quantile(black_box(&sorted), 0.85)));

    let (features, data) = sample_world();
    c.bench_function("domain_and_colors", |b| {
        b.iter(|| {
            let domain = Domain::from_metric(&data, Metric::Population, 0.85);
            let scale = ColorScale::sequential(domain);
            resolve_values(&features.features, &data, Metric::Population)
                .into_iter()
                .map(|v| scale.color(v))
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, bench_project_paths, bench_fill, bench_scale);
criterion_main!(benches);
