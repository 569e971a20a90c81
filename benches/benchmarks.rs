use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use docstore::{DocStore, Fields};
use serde_json::json;
use std::hint::black_box;
use std::path::PathBuf;
use std::time::Duration;

fn bench_path(name: &str, size: usize) -> PathBuf {
    std::env::temp_dir().join(format!("docstore_bench_{}_{}.json", name, size))
}

fn record(id: usize) -> Fields {
    json!({ "id": format!("r{id}"), "value": id })
        .as_object()
        .cloned()
        .unwrap()
}

fn seeded_store(name: &str, size: usize) -> (DocStore, PathBuf) {
    let path = bench_path(name, size);
    let _ = std::fs::remove_file(&path);
    let store = DocStore::builder(&path).pretty(false).build().unwrap();
    for i in 0..size {
        store.create("records", record(i)).unwrap();
    }
    (store, path)
}

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");
    group.sample_size(50);
    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, &size| {
            let path = bench_path("create", size);
            b.iter(|| {
                let _ = std::fs::remove_file(&path);
                let store = DocStore::builder(&path).pretty(false).build().unwrap();
                for i in 0..size {
                    store.create("records", record(i)).unwrap();
                }
            });
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_get_by_id(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_by_id");
    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, &size| {
            let (store, path) = seeded_store("get", size);
            let last = format!("r{}", size - 1);
            // worst case: linear scan to the final record
            b.iter(|| black_box(store.get_by_id("records", &last).unwrap()));
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_list_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_all");
    group.measurement_time(Duration::from_secs(8));
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, &size| {
            let (store, path) = seeded_store("list", size);
            b.iter(|| black_box(store.list_all("records").unwrap()));
            let _ = std::fs::remove_file(&path);
        });
    }
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    group.sample_size(50);
    for size in [100, 1000] {
        group.bench_with_input(BenchmarkId::new("records", size), &size, |b, &size| {
            let (store, path) = seeded_store("update", size);
            let patch = json!({ "value": 1 }).as_object().cloned().unwrap();
            b.iter(|| store.update("records", "r0", &patch).unwrap());
            let _ = std::fs::remove_file(&path);
        });
    }
}

criterion_group!(
    benches,
    bench_create,
    bench_get_by_id,
    bench_list_all,
    bench_update,
);
criterion_main!(benches);
