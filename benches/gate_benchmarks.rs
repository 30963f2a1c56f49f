use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use storedesk::auth::{AuthGate, GateMode, Role};
use storedesk::router::{standard_routes, Navigator};
use storedesk::session::{keys, MemoryStorage, SessionStorage};

fn vendor_storage() -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage
        .set_many(&[(keys::TOKEN, "t1"), (keys::ROLE, "vendor"), (keys::USER_ID, "u1")])
        .unwrap();
    storage
}

fn bench_route_resolve(c: &mut Criterion) {
    let table = standard_routes();
    let mut group = c.benchmark_group("route_resolve");

    group.bench_function("root_group", |b| {
        b.iter(|| table.resolve(black_box("/dashboard")))
    });

    group.bench_function("last_group_with_param", |b| {
        b.iter(|| table.resolve(black_box("/customer/orders/o-42")))
    });

    group.bench_function("unmatched", |b| {
        b.iter(|| table.resolve(black_box("/no/such/page")))
    });

    group.finish();
}

fn bench_gate_check(c: &mut Criterion) {
    let gate = AuthGate::new(Arc::new(vendor_storage()), GateMode::Trusting);
    let mut group = c.benchmark_group("gate_check");

    group.bench_function("granted", |b| {
        b.iter(|| gate.check(black_box(Some(Role::Vendor))))
    });

    group.bench_function("role_mismatch", |b| {
        b.iter(|| gate.check(black_box(Some(Role::Superadmin))))
    });

    group.finish();
}

fn bench_navigate(c: &mut Criterion) {
    let gate = AuthGate::new(Arc::new(vendor_storage()), GateMode::Trusting);
    let navigator = Navigator::new(standard_routes(), gate);

    c.bench_function("navigate_render", |b| {
        b.iter(|| navigator.navigate(black_box("/vendor/orders")))
    });

    c.bench_function("settle_denied", |b| {
        b.iter(|| navigator.settle(black_box("/customer/cart")))
    });
}

criterion_group!(benches, bench_route_resolve, bench_gate_check, bench_navigate);
criterion_main!(benches);
