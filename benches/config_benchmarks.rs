use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use storedesk::config::loader::default_config_content;
use storedesk::Config;

fn bench_config_creation(c: &mut Criterion) {
    c.bench_function("config_default", |b| b.iter(Config::default));
}

fn bench_config_serialization(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("config_to_toml_pretty", |b| {
        b.iter(|| toml::to_string_pretty(black_box(&config)))
    });

    let toml_str = toml::to_string(&config).unwrap();
    c.bench_function("config_from_toml", |b| {
        b.iter(|| toml::from_str::<Config>(black_box(&toml_str)))
    });

    c.bench_function("config_template_parse", |b| {
        b.iter(|| toml::from_str::<Config>(black_box(default_config_content())))
    });
}

fn bench_config_access(c: &mut Criterion) {
    let config = Config::default();

    c.bench_function("config_gate_mode", |b| {
        b.iter(|| black_box(&config).gate_mode())
    });
}

criterion_group!(
    benches,
    bench_config_creation,
    bench_config_serialization,
    bench_config_access
);
criterion_main!(benches);
