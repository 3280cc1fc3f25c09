#![no_main]

use libfuzzer_sys::fuzz_target;

type Coords = Vec<Vec<Vec<Vec<f64>>>>;

// Whether any position has an x or y coordinate that validation must reject.
fn too_large(c: &Coords) -> bool {
    c.iter()
        .flatten()
        .flatten()
        .flat_map(|pos| pos.iter().take(2))
        .any(|x| x.abs() > polysect::MAX_COORDINATE)
}

// Arbitrary nested arrays are mostly garbage (unclosed, self-intersecting,
// overlapping). We only check that they're handled without panicking, and
// that coordinates out of range are refused.
fuzz_target!(|input: (Coords, Coords)| {
    let (a, b) = input;
    let result = polysect::intersect_coordinates(&a, &b);
    if too_large(&a) || too_large(&b) {
        assert!(result.is_err());
    }
    if let Ok(out) = result {
        for poly in out {
            assert!(poly.rings.iter().flatten().all(|p| p.is_finite()));
        }
    }
});
