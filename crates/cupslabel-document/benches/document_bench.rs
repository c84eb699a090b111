// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for media size inference in cupslabel-document.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cupslabel_document::MediaResolver;
use cupslabel_document::media::scan_media_box;

/// A byte blob that fails structured parsing but carries a MediaBox near
/// the end, so the fallback scan has to walk most of it.
fn minimal_label(padding: usize) -> Vec<u8> {
    let mut data = vec![b' '; padding];
    data.extend_from_slice(b"1 0 obj << /Type /Page /MediaBox [0 0 136 85] >> endobj");
    data
}

fn bench_scan_media_box(c: &mut Criterion) {
    let data = minimal_label(64 * 1024);

    c.bench_function("scan_media_box (64 KiB)", |b| {
        b.iter(|| {
            let page_box = scan_media_box(black_box(&data));
            assert!(page_box.is_some());
        });
    });
}

fn bench_resolve_auto(c: &mut Criterion) {
    let resolver = MediaResolver::new();
    let data = minimal_label(4 * 1024);

    c.bench_function("resolve auto (fallback path)", |b| {
        b.iter(|| {
            let media = resolver.resolve(black_box("auto"), black_box(&data));
            black_box(media);
        });
    });
}

criterion_group!(benches, bench_scan_media_box, bench_resolve_auto);
criterion_main!(benches);
