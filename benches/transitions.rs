#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use color_eyre::eyre;
use criterion::{black_box, Criterion};
use moesif::{
    bus::SnoopBus,
    protocol::{moesif as table, SharedLine},
    request::{BusMessage, Kind, MessageKind, ProcessorRequest},
    Config, State,
};
use strum::IntoEnumIterator;

pub fn transition_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("transitions");

    group.bench_function("cache", |b| {
        b.iter(|| {
            for state in State::iter().filter(State::is_stable) {
                for kind in Kind::iter() {
                    let request = ProcessorRequest { kind, addr: 0x100 };
                    let _ = black_box(table::process_cache_request(black_box(state), &request));
                }
            }
        });
    });

    group.bench_function("snoop", |b| {
        let shared_line: &dyn SharedLine = &true;
        b.iter(|| {
            for state in State::iter() {
                for kind in MessageKind::iter() {
                    let message = BusMessage {
                        kind,
                        addr: 0x100,
                        src: 1,
                    };
                    let _ = black_box(table::process_snoop_request(
                        black_box(state),
                        &message,
                        shared_line,
                    ));
                }
            }
        });
    });
}

/// Ping-pong a line between writers and readers.
pub fn run_bus(num_caches: usize, num_accesses: usize) -> eyre::Result<()> {
    let mut bus = SnoopBus::new(Config {
        num_caches,
        log_transitions: false,
        ..Config::default()
    });
    for i in 0..num_accesses {
        let cache = i % num_caches;
        let request = if i % 3 == 0 {
            ProcessorRequest::store(0x100)
        } else {
            ProcessorRequest::load(0x100)
        };
        bus.access(cache, request)?;
    }
    Ok(())
}

pub fn bus_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("bus");
    group.sample_size(20);

    group.bench_function("pingpong/4/1000", |b| {
        b.iter(|| run_bus(black_box(4), black_box(1000)));
    });
}

criterion::criterion_group!(benches, transition_table, bus_benchmark);
criterion::criterion_main!(benches);
