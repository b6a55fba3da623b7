//! Matrix ingest throughput on a synthetic full-width faculty sheet.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use timetable::schedule::matrix::{extract_matrix, MatrixLayout};
use timetable::schedule::ScheduleSnapshot;
use timetable::sheet::SheetGrid;

const GROUPS: usize = 40;

/// Every group has a lesson in every period of every day; every third lesson is shared.
fn faculty_sheet() -> SheetGrid {
    let layout = MatrixLayout::default();
    let mut grid = SheetGrid::blank(54, 2 + GROUPS * 2);
    for group in 0..GROUPS {
        let col = 2 + group * 2;
        grid.set(6, col, format!("{}-A (IT)", 100 + group));
        grid.set(6, col + 1, "s/s");
        grid.set(7, col, format!("Stream {group}"));
    }
    for block in &layout.blocks {
        for row in (block.first_row..block.last_row).step_by(2) {
            for group in 0..GROUPS {
                let col = 2 + group * 2;
                if group % 3 == 1 {
                    continue;
                }
                grid.set(row, col, format!("Subject {}\nlecture", (row + group) % 17));
                grid.set(row + 1, col, format!("Dr. Teacher{} (KT)", group % 9));
                if group % 3 == 2 {
                    grid.set(row, col + 1, format!("{}", 100 + row));
                }
            }
        }
    }
    // Merged day labels in the first column, as real sheets have them.
    for block in &layout.blocks {
        grid.set(block.first_row, 0, block.day.local_name());
        grid.merge(block.first_row, 0, block.last_row, 0);
    }
    grid
}

fn bench_ingest(c: &mut Criterion) {
    let grid = faculty_sheet();
    let layout = MatrixLayout::default();
    let rows = extract_matrix(&grid, &layout).len() as u64;

    let mut group = c.benchmark_group("ingest");
    group.throughput(Throughput::Elements(rows));
    group.bench_function("matrix_extract", |b| {
        b.iter(|| extract_matrix(black_box(&grid), &layout))
    });
    group.bench_function("matrix_extract_and_index", |b| {
        b.iter(|| ScheduleSnapshot::build(extract_matrix(black_box(&grid), &layout)))
    });
    group.finish();
}

criterion_group!(benches, bench_ingest);
criterion_main!(benches);
