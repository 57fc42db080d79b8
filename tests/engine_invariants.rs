//! Engine invariant tests: symmetry, band monotonicity, path validity, and
//! the rolling/full-table equivalence, on seeded random inputs.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use timewarp::{ConfigError, Dtw, DtwError, InputError, Metric, Series, WindowPolicy};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random_series(rng: &mut ChaCha8Rng, len: usize) -> Series {
    let values: Vec<f64> = (0..len).map(|_| rng.gen_range(-5.0..5.0)).collect();
    Series::new(values).expect("random values are finite")
}

// ---------------------------------------------------------------------------
// Symmetry
// ---------------------------------------------------------------------------

/// All supported metrics are symmetric, so the DTW cost must be too.
#[test]
fn distance_is_symmetric() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for metric in [Metric::Absolute, Metric::Squared, Metric::SquaredEuclidean] {
        let dtw = Dtw::new(metric);
        for _ in 0..20 {
            let (n, m) = (rng.gen_range(1..30), rng.gen_range(1..30));
            let a = random_series(&mut rng, n);
            let b = random_series(&mut rng, m);
            let ab = dtw.distance(a.as_view(), b.as_view()).unwrap().value();
            let ba = dtw.distance(b.as_view(), a.as_view()).unwrap().value();
            assert!(
                (ab - ba).abs() < 1e-10,
                "{metric:?}: distance(a,b) = {ab} but distance(b,a) = {ba}"
            );
        }
    }
}

/// Aligning a sequence with itself costs zero along the pure diagonal.
#[test]
fn self_alignment_is_zero_diagonal() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let dtw = Dtw::new(Metric::Squared);
    for _ in 0..10 {
        let len = rng.gen_range(1..40);
        let a = random_series(&mut rng, len);
        let (cost, path) = dtw.align(a.as_view(), a.as_view()).unwrap();
        assert_eq!(cost.value(), 0.0);
        assert_eq!(path.len(), a.len());
        for (t, step) in path.steps().iter().enumerate() {
            assert_eq!((step.a, step.b), (t, t), "path left the diagonal");
        }
    }
}

// ---------------------------------------------------------------------------
// Rolling / full-table agreement
// ---------------------------------------------------------------------------

/// `align` must report the same cost as `distance` under every window.
#[test]
fn align_cost_equals_distance() {
    let mut rng = ChaCha8Rng::seed_from_u64(123);
    for _ in 0..30 {
        let n = rng.gen_range(1..40);
        let m = rng.gen_range(1..40);
        let a = random_series(&mut rng, n);
        let b = random_series(&mut rng, m);

        let gap = n.abs_diff(m);
        for window in [
            WindowPolicy::Unconstrained,
            WindowPolicy::SakoeChiba { radius: gap },
            WindowPolicy::SakoeChiba { radius: gap + 3 },
        ] {
            let dtw = Dtw::new(Metric::Squared).with_window(window);
            let d = dtw.distance(a.as_view(), b.as_view()).unwrap().value();
            let (c, _) = dtw.align(a.as_view(), b.as_view()).unwrap();
            assert!(
                (d - c.value()).abs() < 1e-10,
                "{window:?} on ({n}, {m}): distance {d} != align {}",
                c.value()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Band monotonicity
// ---------------------------------------------------------------------------

/// Widening the band never increases the cost, and a radius of max(n, m)
/// matches unconstrained computation exactly.
#[test]
fn band_widening_is_monotone() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..10 {
        let len = rng.gen_range(4..32);
        let a = random_series(&mut rng, len);
        let b = random_series(&mut rng, len);

        let mut last = f64::INFINITY;
        for radius in 0..len {
            let dtw = Dtw::new(Metric::Squared).with_band(radius);
            let cost = dtw.distance(a.as_view(), b.as_view()).unwrap().value();
            assert!(
                cost <= last + 1e-10,
                "radius {radius} increased cost from {last} to {cost}"
            );
            last = cost;
        }

        let capped = Dtw::new(Metric::Squared).with_band(len);
        let unconstrained = Dtw::new(Metric::Squared);
        let dc = capped.distance(a.as_view(), b.as_view()).unwrap().value();
        let du = unconstrained.distance(a.as_view(), b.as_view()).unwrap().value();
        assert!(
            (dc - du).abs() < 1e-10,
            "radius = len must equal unconstrained: {dc} vs {du}"
        );
    }
}

// ---------------------------------------------------------------------------
// Path validity
// ---------------------------------------------------------------------------

/// Every reconstructed path is monotone, steps by one of
/// {(1,1), (1,0), (0,1)}, spans corner to corner, and stays in-band.
#[test]
fn paths_are_valid_warping_paths() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..25 {
        let n = rng.gen_range(1..35);
        let m = rng.gen_range(1..35);
        let a = random_series(&mut rng, n);
        let b = random_series(&mut rng, m);

        let gap = n.abs_diff(m);
        for window in [
            WindowPolicy::Unconstrained,
            WindowPolicy::SakoeChiba { radius: gap + 1 },
        ] {
            let dtw = Dtw::new(Metric::Absolute).with_window(window);
            let (_, path) = dtw.align(a.as_view(), b.as_view()).unwrap();
            let steps = path.steps();

            assert_eq!(steps.first().unwrap(), &timewarp::WarpingStep { a: 0, b: 0 });
            assert_eq!(
                steps.last().unwrap(),
                &timewarp::WarpingStep { a: n - 1, b: m - 1 }
            );

            for pair in steps.windows(2) {
                let da = pair[1].a - pair[0].a;
                let db = pair[1].b - pair[0].b;
                assert!(
                    matches!((da, db), (1, 1) | (1, 0) | (0, 1)),
                    "illegal step ({da}, {db}) in {window:?}"
                );
            }

            for step in steps {
                assert!(
                    window.contains(step.a, step.b, n, m),
                    "step ({}, {}) left the window {window:?}",
                    step.a,
                    step.b
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cutoff exactness
// ---------------------------------------------------------------------------

/// A finite early-abandoned cost equals the exact cost; a cutoff below the
/// exact cost yields the infinite sentinel.
#[test]
fn cutoff_is_exact() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let dtw = Dtw::new(Metric::Squared);
    for _ in 0..20 {
        let (n, m) = (rng.gen_range(2..30), rng.gen_range(2..30));
        let a = random_series(&mut rng, n);
        let b = random_series(&mut rng, m);
        let exact = dtw.distance(a.as_view(), b.as_view()).unwrap().value();

        let above = dtw
            .distance_with_cutoff(a.as_view(), b.as_view(), exact + 1e-6)
            .unwrap();
        assert!(
            (above.value() - exact).abs() < 1e-10,
            "cutoff above exact cost changed the result: {} vs {exact}",
            above.value()
        );

        if exact > 1e-6 {
            let below = dtw
                .distance_with_cutoff(a.as_view(), b.as_view(), exact - 1e-6)
                .unwrap();
            assert!(
                !below.is_finite(),
                "cutoff below exact cost {exact} returned finite {}",
                below.value()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Pairwise consistency
// ---------------------------------------------------------------------------

/// The parallel pairwise matrix agrees with individual distance calls.
#[test]
fn pairwise_agrees_with_individual_distances() {
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let series: Vec<Series> = (0..8)
        .map(|_| {
            let len = rng.gen_range(3..20);
            random_series(&mut rng, len)
        })
        .collect();

    let dtw = Dtw::new(Metric::Squared);
    let matrix = dtw.pairwise(&series).unwrap();
    assert_eq!(matrix.len(), series.len());

    for i in 0..series.len() {
        for j in 0..series.len() {
            let direct = if i == j {
                0.0
            } else {
                dtw.distance(series[i].as_view(), series[j].as_view())
                    .unwrap()
                    .value()
            };
            assert!(
                (matrix.get(i, j).value() - direct).abs() < 1e-10,
                "pairwise ({i}, {j}) disagrees with direct distance"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Boundary scenarios
// ---------------------------------------------------------------------------

#[test]
fn empty_pair_aligns_at_zero() {
    let dtw = Dtw::new(Metric::Squared);
    let empty = Series::new(vec![]).unwrap();
    let (cost, path) = dtw.align(empty.as_view(), empty.as_view()).unwrap();
    assert_eq!(cost.value(), 0.0);
    assert!(path.is_empty());
}

#[test]
fn one_sided_empty_fails() {
    let dtw = Dtw::new(Metric::Squared);
    let a = Series::new(vec![1.0]).unwrap();
    let empty = Series::new(vec![]).unwrap();
    assert!(matches!(
        dtw.distance(a.as_view(), empty.as_view()),
        Err(DtwError::InvalidInput(InputError::EmptyMismatch { .. }))
    ));
}

#[test]
fn zero_radius_unequal_lengths_fails() {
    let dtw = Dtw::new(Metric::Squared).with_band(0);
    let a = Series::new(vec![1.0, 2.0, 3.0]).unwrap();
    let b = Series::new(vec![1.0, 2.0]).unwrap();
    assert!(matches!(
        dtw.align(a.as_view(), b.as_view()),
        Err(DtwError::InvalidConfiguration(ConfigError::BandTooNarrow { .. }))
    ));
}

#[test]
fn zero_radius_equal_lengths_is_diagonal() {
    // with radius 0 only the diagonal is admissible, so the cost is the
    // sum of elementwise local costs
    let dtw = Dtw::new(Metric::Squared).with_band(0);
    let a = Series::new(vec![0.0, 0.0, 0.0]).unwrap();
    let b = Series::new(vec![1.0, 1.0, 1.0]).unwrap();
    let (cost, path) = dtw.align(a.as_view(), b.as_view()).unwrap();
    assert!((cost.value() - 3.0).abs() < 1e-10);
    for (t, step) in path.steps().iter().enumerate() {
        assert_eq!((step.a, step.b), (t, t));
    }
}
