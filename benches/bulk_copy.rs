use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fmap::{MapWindow, RequestedRange, Target, TransferDirection, copy, page_size, resolve};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tempfile::tempdir;

/// 测试参数
const FILE_SIZE: usize = 64 * 1024 * 1024; // 64MB
const OFFSET: i64 = 4096 + 904; // 非页对齐偏移
const SIZE: i64 = 32 * 1024 * 1024; // 32MB

/// 使用 mmap 映射范围并复制到输出
fn bench_mmap_read(path: &Path) {
    let target = Target::open(path).unwrap();
    let (file_size, _) = target.size().unwrap();
    let range = resolve(RequestedRange::from_signed(OFFSET, SIZE), file_size).unwrap();
    let mut mapping = target.map(MapWindow::new(range, page_size().unwrap())).unwrap();

    copy(
        TransferDirection::ReadFromMapping,
        mapping.view_mut(),
        &mut io::empty(),
        &mut io::sink(),
    )
    .unwrap();

    mapping.unmap().unwrap();
    target.close().unwrap();
}

/// 使用 seek + read 读取相同范围
fn bench_std_read(path: &Path) {
    let mut file = File::open(path).unwrap();
    file.seek(SeekFrom::Start(OFFSET as u64)).unwrap();
    io::copy(&mut file.take(SIZE as u64), &mut io::sink()).unwrap();
}

fn bulk_copy_benchmark(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.bin");
    let data: Vec<u8> = (0..FILE_SIZE).map(|i| i as u8).collect();
    std::fs::write(&path, &data).unwrap();

    let mut group = c.benchmark_group("bulk_copy");
    group.sample_size(20);

    let label = format!("{}MB_at_{}", SIZE / (1024 * 1024), OFFSET);

    group.bench_function(BenchmarkId::new("mmap", &label), |b| {
        b.iter(|| bench_mmap_read(&path));
    });

    group.bench_function(BenchmarkId::new("std_read", &label), |b| {
        b.iter(|| bench_std_read(&path));
    });

    group.finish();
}

criterion_group!(benches, bulk_copy_benchmark);
criterion_main!(benches);
