//! Criterion benchmarks for modlog

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use modlog::core::render_template;
use modlog::prelude::*;
use std::sync::Arc;

struct Discard;

impl Backend for Discard {
    fn log(&self, _level: Level, calldepth: usize, record: &mut Record) -> Result<()> {
        black_box(record.formatted(calldepth + 1)?);
        Ok(())
    }
}

// ============================================================================
// Level Resolution Benchmarks
// ============================================================================

fn bench_level_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_resolution");
    group.throughput(Throughput::Elements(1));

    for patterns in [1usize, 16, 128] {
        let leveled = ModuleLeveled::new(Discard);
        for i in 0..patterns {
            leveled.set_level(Level::Warning, &format!("svc{}.*", i));
        }
        leveled.set_level(Level::Info, "svc0.exact");

        group.bench_with_input(BenchmarkId::new("cached", patterns), &leveled, |b, leveled| {
            leveled.get_level("svc0.handler");
            b.iter(|| black_box(leveled.get_level(black_box("svc0.handler"))));
        });

        group.bench_with_input(
            BenchmarkId::new("uncached", patterns),
            &leveled,
            |b, leveled| {
                b.iter(|| {
                    // a pattern registration clears the cache
                    leveled.set_level(Level::Warning, "svc0.*");
                    black_box(leveled.get_level(black_box("svc0.handler")))
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Logging Path Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let leveled = ModuleLeveled::new(Discard);
    leveled.set_level(Level::Info, "");
    let logger = Logger::builder()
        .module("bench")
        .leveled_backend(Arc::new(leveled))
        .build();

    group.bench_function("disabled_debug", |b| {
        b.iter(|| logger.debug(black_box("Debug message"), vec![]));
    });

    group.bench_function("info_text", |b| {
        b.iter(|| logger.info(black_box("Request {} took {}ms"), vec![Arg::from(42), Arg::from(7)]));
    });

    let annotated = Annotator::new(Discard);
    annotated.add("service", "api");
    annotated.add("region", "eu-west-1");
    let annotated_logger = Logger::builder().module("bench").backend(annotated).build();

    group.bench_function("info_annotated", |b| {
        b.iter(|| annotated_logger.info(black_box("Annotated message"), vec![]));
    });

    let json = ModuleLeveled::new(Discard);
    json.set_formatter(Arc::new(
        TextFormatter::new().with_output_format(OutputFormat::Json),
    ));
    let json_logger = Logger::builder()
        .module("bench")
        .leveled_backend(Arc::new(json))
        .build();

    group.bench_function("info_json", |b| {
        b.iter(|| json_logger.info(black_box("Json message {}"), vec![Arg::from("payload")]));
    });

    group.finish();
}

// ============================================================================
// Template Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_template");

    let args = vec![
        Arg::from("alice"),
        Arg::from(Secret::new("hunter2")),
        Arg::from(3.5),
    ];
    group.bench_function("mixed_args", |b| {
        b.iter(|| render_template(black_box("user {} pw {} score {}"), black_box(&args)));
    });

    group.finish();
}

criterion_group!(benches, bench_level_resolution, bench_logging, bench_render);
criterion_main!(benches);
