//! A read benchmark that measures file-read throughput: a throughput-scaled
//! benchmark group with one bench per file found in the root directory.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use fatnav::storage::FileBackedStorage;
use fatnav::FatFs;

const IMG_FILE_PATH: &str = "assets/fat.img";

fn bench_read_speed(c: &mut Criterion) {
    let mut group = c.benchmark_group("read speed");

    let storage = match FileBackedStorage::open(IMG_FILE_PATH) {
        Ok(s) => s,
        Err(_) => {
            eprintln!("skipping: no test image at {}", IMG_FILE_PATH);
            return;
        }
    };

    let mut fs = FatFs::mount(storage).unwrap();
    let entries = fs.read_root_dir().unwrap();

    for entry in entries {
        group.throughput(Throughput::Bytes(entry.size as u64));

        group.bench_with_input(
            BenchmarkId::new("file read speed", entry.size),
            &entry,
            |b, entry| {
                b.iter(|| fs.read_file_to_vec(entry).unwrap());
            },
        );
    }
}

criterion_group!(benches, bench_read_speed);
criterion_main!(benches);
