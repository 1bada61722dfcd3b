//! Criterion benchmarks for zmacro-resolver.
//!
//! - Trigger names, 1K triggers over 50 hosts with a two-level template chain
//! - Trigger expressions, 1K triggers
//! - Substitution of a single text with 8 macros

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use zmacro_core::types::*;
use zmacro_core::MemorySource;
use zmacro_resolver::substitute::Substitution;
use zmacro_resolver::{ExpressionOptions, MacroResolver, NameOptions};

const NOW: i64 = 1_700_000_000;
const HOSTS: u64 = 50;
const TRIGGERS: u64 = 1_000;

fn build_source() -> (MemorySource, Vec<Trigger>) {
    let mut source = MemorySource::new()
        .with_host(9_000, "Template App", "Template App")
        .with_host(9_001, "Template OS", "Template OS")
        .with_template_link(9_000, 9_001)
        .with_host_macro(9_001, "{$LIMIT}", "90")
        .with_global_macro("{$OWNER}", "ops");

    for host in 1..=HOSTS {
        source = source
            .with_host(host, &format!("host{host}"), &format!("Host {host}"))
            .with_template_link(host, 9_000)
            .with_interface(InterfaceRow {
                interface_id: InterfaceId(host),
                host_id: HostId(host),
                interface_type: InterfaceType::Agent,
                main: true,
                use_ip: true,
                ip: format!("10.0.{}.{}", host / 256, host % 256),
                dns: String::new(),
                port: "10050".into(),
            })
            .with_item(ItemRow {
                item_id: ItemId(host),
                host_id: HostId(host),
                interface_id: None,
                name: "CPU load".into(),
                key: "system.cpu.load".into(),
                value_type: ValueType::Float,
                units: "%".into(),
                value_map_id: None,
            })
            .with_value(host, NOW - 30, "42.5");
    }

    let mut triggers = Vec::new();
    for id in 1..=TRIGGERS {
        let host = id % HOSTS + 1;
        source = source.with_function(FunctionRow {
            function_id: FunctionId(id),
            trigger_id: TriggerId(id),
            item_id: ItemId(host),
            host_id: HostId(host),
            function: "avg".into(),
            parameter: "5m".into(),
        });
        triggers.push(Trigger::new(
            id,
            "{HOST.NAME} ({HOST.IP}) load {ITEM.LASTVALUE} over $1, ask {$OWNER}",
            format!("{{{id}}}>{{$LIMIT}}"),
        ));
    }
    (source, triggers)
}

fn bench_trigger_names(c: &mut Criterion) {
    let (source, triggers) = build_source();
    c.bench_function("trigger_names_1k", |bench| {
        bench.iter(|| {
            let resolver = MacroResolver::new(&source).at_time(NOW);
            black_box(
                resolver
                    .resolve_trigger_names(black_box(&triggers), NameOptions::default())
                    .unwrap(),
            )
        })
    });
}

fn bench_trigger_expressions(c: &mut Criterion) {
    let (source, triggers) = build_source();
    let options = ExpressionOptions {
        resolve_usermacros: true,
        ..ExpressionOptions::default()
    };
    c.bench_function("trigger_expressions_1k", |bench| {
        bench.iter(|| {
            black_box(
                MacroResolver::new(&source)
                    .resolve_trigger_expressions(black_box(&triggers), options)
                    .unwrap(),
            )
        })
    });
}

fn bench_substitution(c: &mut Criterion) {
    let values: FxHashMap<String, String> = (1..=8)
        .map(|i| (format!("{{HOST.NAME{i}}}"), format!("host-{i}")))
        .collect();
    let text = "{HOST.NAME1} {HOST.NAME2} {HOST.NAME3} {HOST.NAME4} and {HOST.NAME5}, \
                {HOST.NAME6}, {HOST.NAME7}, {HOST.NAME8} with {$UNTOUCHED} and $1";
    c.bench_function("substitute_8_macros", |bench| {
        bench.iter(|| black_box(Substitution::new(&values).apply(black_box(text))))
    });
}

criterion_group!(
    benches,
    bench_trigger_names,
    bench_trigger_expressions,
    bench_substitution
);
criterion_main!(benches);
