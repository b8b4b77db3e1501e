use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rankcloud::config::LayoutConfig;
use rankcloud::ir::RankedEntry;
use rankcloud::layout::{Canvas, compute_layout_seeded};
use rankcloud::render::render_svg;
use rankcloud::text_metrics::HeuristicMetrics;
use rankcloud::theme::Theme;
use std::hint::black_box;

fn leaderboard(count: usize) -> Vec<RankedEntry> {
    (0..count)
        .map(|i| RankedEntry::new(format!("player {i}"), ((i * 37) % 251) as i64))
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let theme = Theme::neon();
    let config = LayoutConfig::default();
    let metrics = HeuristicMetrics::default();
    let mut group = c.benchmark_group("layout");
    for count in [20usize, 100, 500] {
        let entries = leaderboard(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &entries, |b, entries| {
            b.iter(|| {
                let layout = compute_layout_seeded(
                    black_box(entries),
                    &theme,
                    &config,
                    Canvas::new(1400.0, config.boundary_margin),
                    &metrics,
                    Some(1),
                );
                black_box(layout.labels.len())
            })
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let theme = Theme::neon();
    let config = LayoutConfig::default();
    let layout = compute_layout_seeded(
        &leaderboard(100),
        &theme,
        &config,
        Canvas::new(1400.0, config.boundary_margin),
        &HeuristicMetrics::default(),
        Some(1),
    );
    c.bench_function("render_svg_100", |b| {
        b.iter(|| black_box(render_svg(black_box(&layout), &theme)))
    });
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
