use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polysect::{
    generators::{checkerboard, frames, slanted_checkerboard, slanties},
    intersection, intersection_with, IntersectionGraph, Options, Polygon, Segments,
};

fn build_arrangement(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    let segs = Segments::from_rings(
        even.iter()
            .chain(&odd)
            .flat_map(|p| p.rings.iter().map(|r| r.as_slice())),
    );

    c.bench_function("arrangement", |b| {
        b.iter(|| black_box(IntersectionGraph::new(&segs, true)))
    });
    c.bench_function("arrangement without prefilter", |b| {
        b.iter(|| black_box(IntersectionGraph::new(&segs, false)))
    });
}

fn intersect(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    c.bench_function("checkerboard", |b| {
        b.iter(|| black_box(intersection(&even, &odd)))
    });

    let (even, odd) = slanted_checkerboard(10);
    c.bench_function("slanted checkerboard", |b| {
        b.iter(|| black_box(intersection(&even, &odd)))
    });

    let (even, odd) = slanties(10);
    c.bench_function("slanties", |b| {
        b.iter(|| black_box(intersection(&even, &odd)))
    });

    let holey = frames(10);
    let (even, _) = checkerboard(10);
    let opts = Options {
        validate: false,
        ..Options::default()
    };
    c.bench_function("frames, unvalidated", |b| {
        b.iter(|| black_box(intersection_with(&holey, &even, &opts)))
    });
}

fn compare_i_overlay(c: &mut Criterion) {
    // i_overlay wants open rings.
    let to_float_arrays = |polys: &[Polygon]| -> Vec<Vec<[f64; 2]>> {
        polys
            .iter()
            .flat_map(|p| &p.rings)
            .map(|r| r[..r.len() - 1].iter().map(|p| [p.x, p.y]).collect())
            .collect()
    };

    let (even, odd) = checkerboard(10);
    let even = to_float_arrays(&even);
    let odd = to_float_arrays(&odd);

    c.bench_function("checkerboard i_overlay", |b| {
        b.iter(|| {
            use i_overlay::float::single::SingleFloatOverlay;
            black_box(even.overlay(
                &odd,
                i_overlay::core::overlay_rule::OverlayRule::Intersect,
                i_overlay::core::fill_rule::FillRule::EvenOdd,
            ));
        });
    });
}

criterion_group!(benches, build_arrangement, intersect, compare_i_overlay);
criterion_main!(benches);
