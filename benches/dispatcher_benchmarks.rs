//! Criterion benchmarks for rust_log_dispatcher

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_log_dispatcher::core::template::render;
use rust_log_dispatcher::prelude::*;
use rust_log_dispatcher::writers::{ChannelWriter, OverflowPolicy};

/// Writer that accepts and discards everything
struct NullWriter;

impl LogWriter for NullWriter {
    fn write(&mut self, record: &LogRecord) -> Result<bool> {
        black_box(record);
        Ok(true)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

// ============================================================================
// Filtered-out calls: the cost paid when nobody is listening
// ============================================================================

fn bench_filtered_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_out");
    group.throughput(Throughput::Elements(1));

    let log = Dispatcher::new();
    log.add_filter("null", LogLevel::Error, Box::new(NullWriter));

    group.bench_function("static_str", |b| {
        b.iter(|| log.debug(black_box("not interesting")));
    });

    group.bench_function("deferred", |b| {
        b.iter(|| log.log_lazy(LogLevel::Debug, || format!("{:?}", black_box([1u8; 64]))));
    });

    group.bench_function("template", |b| {
        b.iter(|| log.logf(LogLevel::Debug, "user %s id %d", args![black_box("alice"), 42]));
    });

    group.finish();
}

// ============================================================================
// Delivered calls
// ============================================================================

fn bench_delivered(c: &mut Criterion) {
    let mut group = c.benchmark_group("delivered");
    group.throughput(Throughput::Elements(1));

    let log = Dispatcher::new();
    log.add_filter("null", LogLevel::Trace, Box::new(NullWriter));

    group.bench_function("static_str", |b| {
        b.iter(|| log.info(black_box("Request processed")));
    });

    group.bench_function("template", |b| {
        b.iter(|| log.logf(LogLevel::Info, "%s took %.2fms", args![black_box("GET /"), 1.25]));
    });

    group.bench_function("values", |b| {
        b.iter(|| log.info(Message::values(args!["status", black_box(200), true])));
    });

    let fan_out = Dispatcher::new();
    for i in 0..4 {
        fan_out.add_filter(format!("null-{}", i), LogLevel::Trace, Box::new(NullWriter));
    }
    group.bench_function("fan_out_4", |b| {
        b.iter(|| fan_out.info(black_box("Request processed")));
    });

    let channel = ChannelWriter::new(Box::new(NullWriter), 4096, OverflowPolicy::Block)
        .expect("worker thread");
    let buffered = Dispatcher::new();
    buffered.add_filter("channel", LogLevel::Trace, Box::new(channel));
    group.bench_function("channel_writer", |b| {
        b.iter(|| buffered.info(black_box("Request processed")));
    });

    group.finish();
}

// ============================================================================
// Template rendering
// ============================================================================

fn bench_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("template");

    let args = args!["alice", 42, 0.875, true];
    group.bench_function("mixed_verbs", |b| {
        b.iter(|| render(black_box("user=%s id=%05d ratio=%.3f ok=%t"), black_box(&args)));
    });

    group.bench_function("no_verbs", |b| {
        b.iter(|| render(black_box("a plain line with no substitutions at all"), &[]));
    });

    group.finish();
}

criterion_group!(benches, bench_filtered_out, bench_delivered, bench_template);
criterion_main!(benches);
