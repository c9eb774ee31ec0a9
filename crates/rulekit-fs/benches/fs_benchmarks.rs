use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rulekit_fs::{NormalizedPath, io};
use tempfile::tempdir;

fn write_atomic_benchmark(c: &mut Criterion) {
    c.bench_function("io::write_atomic", |b| {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("rule.instructions.md"));
        let content = "---\ndescription: bench\n---\n\nbody".as_bytes();

        b.iter(|| {
            io::write_atomic(black_box(&path), black_box(content)).unwrap();
        })
    });
}

fn write_if_changed_benchmark(c: &mut Criterion) {
    c.bench_function("io::write_if_changed (unchanged)", |b| {
        let dir = tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("rule.instructions.md"));
        let content = "---\ndescription: bench\n---\n\nbody".as_bytes();
        io::write_atomic(&path, content).unwrap();

        b.iter(|| {
            io::write_if_changed(black_box(&path), black_box(content)).unwrap();
        })
    });
}

criterion_group!(benches, write_atomic_benchmark, write_if_changed_benchmark);
criterion_main!(benches);
