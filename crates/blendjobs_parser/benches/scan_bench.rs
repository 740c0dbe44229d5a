use blendjobs_parser::{ScanMode, ScanOptions, scan_reader};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use std::io::{Cursor, Write};

/// 64-bit little-endian file: `scenes` REND records, then `filler` DATA blocks of 1 KiB.
fn synthetic_blend(scenes: usize, filler: usize) -> Vec<u8> {
    let mut out = b"BLENDER-v279".to_vec();
    let bhead = |out: &mut Vec<u8>, code: &[u8; 4], size: u32| {
        out.extend_from_slice(code);
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&[0u8; 16]);
    };
    for i in 0..scenes {
        bhead(&mut out, b"REND", 72);
        out.extend_from_slice(&1i32.to_le_bytes());
        out.extend_from_slice(&(250 + i as i32).to_le_bytes());
        let mut name = [0u8; 64];
        let label = format!("Scene.{i:03}");
        name[..label.len()].copy_from_slice(label.as_bytes());
        out.extend_from_slice(&name);
    }
    for _ in 0..filler {
        bhead(&mut out, b"DATA", 1024);
        out.extend_from_slice(&[0u8; 1024]);
    }
    bhead(&mut out, b"ENDB", 0);
    out
}

fn benchmark_leading_scan(c: &mut Criterion) {
    let raw = synthetic_blend(8, 4096);
    let mut enc = GzEncoder::new(Vec::new(), GzLevel::fast());
    enc.write_all(&raw).unwrap();
    let packed = enc.finish().unwrap();
    let options = ScanOptions::default();

    c.bench_function("scan_leading_plain", |b| {
        b.iter(|| black_box(scan_reader(Cursor::new(&raw), &options)).unwrap())
    });
    c.bench_function("scan_leading_gzip", |b| {
        b.iter(|| black_box(scan_reader(Cursor::new(&packed), &options)).unwrap())
    });
}

fn benchmark_all_blocks_scan(c: &mut Criterion) {
    let raw = synthetic_blend(8, 4096);
    let options = ScanOptions {
        mode: ScanMode::AllBlocks,
    };

    c.bench_function("scan_all_blocks_plain", |b| {
        b.iter(|| black_box(scan_reader(Cursor::new(&raw), &options)).unwrap())
    });
}

criterion_group!(benches, benchmark_leading_scan, benchmark_all_blocks_scan);
criterion_main!(benches);
