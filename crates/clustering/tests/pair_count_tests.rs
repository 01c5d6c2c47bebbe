mod common;

use clustering::{
    Catalog, ErrorKind, KdTree, PairKind, RuntimeSpec, count_pairs, count_pairs_with,
};
use common::{brute_force_counts, random_points};

const EDGES: [f64; 5] = [0.0, 0.05, 0.1, 0.2, 0.35];

#[test]
fn auto_counts_match_brute_force() {
    let catalog = random_points(400, 0.0, 1.0, 10);
    let counts = count_pairs(&catalog, &EDGES, None).unwrap();
    assert_eq!(counts.kind(), PairKind::Auto);
    let expected = brute_force_counts(&catalog.to_points(), None, &EDGES);
    assert_eq!(counts.counts(), expected.as_slice());
    assert!(counts.counts().iter().all(|&c| c > 0));
}

#[test]
fn cross_counts_match_brute_force() {
    let a = random_points(300, 0.0, 1.0, 11);
    let b = random_points(250, 0.2, 1.1, 12);
    let edges = [0.02, 0.07, 0.15, 0.3];
    let counts = count_pairs(&a, &edges, Some(&b)).unwrap();
    assert_eq!(counts.kind(), PairKind::Cross);
    assert_eq!(counts.catalog_sizes(), (300, 250));
    let expected = brute_force_counts(&a.to_points(), Some(&b.to_points()), &edges);
    assert_eq!(counts.counts(), expected.as_slice());
}

#[test]
fn cross_counts_are_symmetric() {
    let a = random_points(200, 0.0, 1.0, 13);
    let b = random_points(300, 0.0, 1.0, 14);
    let ab = count_pairs(&a, &EDGES, Some(&b)).unwrap();
    let ba = count_pairs(&b, &EDGES, Some(&a)).unwrap();
    assert_eq!(ab.counts(), ba.counts());
    assert_eq!(ab.normalized(), ba.normalized());
}

#[test]
fn auto_counts_are_half_of_self_cross_counts() {
    // cross-counting a catalog with itself sees every pair twice, plus each
    // point paired with itself (at zero separation)
    let catalog = random_points(300, 0.0, 1.0, 15);
    let auto = count_pairs(&catalog, &EDGES, None).unwrap();
    let cross = count_pairs(&catalog, &EDGES, Some(&catalog)).unwrap();
    for (i, (a, c)) in auto.counts().iter().zip(cross.counts()).enumerate() {
        let self_pairs = if i == 0 { 300 } else { 0 };
        assert_eq!(2 * a + self_pairs, *c, "bin {i}");
    }
}

#[test]
fn serial_and_threaded_agree() {
    let a = random_points(500, -1.0, 1.0, 16);
    let b = random_points(500, -1.0, 1.0, 17);
    let edges = [0.1, 0.2, 0.4, 0.8];
    for catalog_b in [None, Some(&b)] {
        let serial = count_pairs_with(&a, &edges, catalog_b, &RuntimeSpec::Serial).unwrap();
        let threaded = count_pairs_with(&a, &edges, catalog_b, &RuntimeSpec::Threaded).unwrap();
        assert_eq!(serial, threaded);
    }
}

#[test]
fn normalization() {
    let a = random_points(100, 0.0, 1.0, 18);
    let b = random_points(40, 0.0, 1.0, 19);
    let auto = count_pairs(&a, &EDGES, None).unwrap();
    assert_eq!(auto.n_possible_pairs(), 100.0 * 99.0 / 2.0);
    let cross = count_pairs(&a, &EDGES, Some(&b)).unwrap();
    assert_eq!(cross.n_possible_pairs(), 4000.0);
    for (n, c) in cross.normalized().iter().zip(cross.counts()) {
        assert_eq!(*n, *c as f64 / 4000.0);
    }

    // a single point has no unique pairs
    let single = Catalog::from_points(&[[0.5, 0.5, 0.5]]).unwrap();
    let counts = count_pairs(&single, &EDGES, None).unwrap();
    assert!(counts.counts().iter().all(|&c| c == 0));
    assert!(counts.normalized().iter().all(|n| n.is_nan()));
}

#[test]
fn bin_boundaries() {
    let catalog =
        Catalog::from_points(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]).unwrap();
    // separations are 1, 2 and 3
    let counts = count_pairs(&catalog, &[1.0, 2.0, 3.0], None).unwrap();
    assert_eq!(counts.counts(), &[1, 2]);
    let counts = count_pairs(&catalog, &[0.5, 1.0, 2.5], None).unwrap();
    assert_eq!(counts.counts(), &[0, 2]);
    assert_eq!(counts.bin_centers(), vec![0.75, 1.75]);
}

#[test]
fn invalid_inputs() {
    let catalog = random_points(10, 0.0, 1.0, 20);
    for edges in [&[0.1][..], &[0.2, 0.1], &[-0.1, 0.1], &[0.0, f64::NAN], &[0.1, 0.1]] {
        let err = count_pairs(&catalog, edges, None).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::InvalidBins { .. }),
            "{edges:?}"
        );
    }

    let empty = Catalog::empty();
    let err = count_pairs(&empty, &EDGES, None).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::EmptyCatalog { .. }));
    let err = count_pairs(&catalog, &EDGES, Some(&empty)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::EmptyCatalog { .. }));
}

#[test]
fn tree_queries_match_brute_force() {
    let catalog = random_points(600, 0.0, 1.0, 21);
    let points = catalog.to_points();
    let tree = KdTree::build(&catalog);
    assert_eq!(tree.len(), 600);
    for center in [[0.5, 0.5, 0.5], [0.0, 0.0, 0.0], [1.2, 0.3, -0.1]] {
        let found = tree.query_ball_point(&center, 0.25);
        let expected: Vec<usize> = (0..points.len())
            .filter(|&i| {
                let p = points[i];
                let d2 = (p[0] - center[0]).powi(2)
                    + (p[1] - center[1]).powi(2)
                    + (p[2] - center[2]).powi(2);
                d2 <= 0.25 * 0.25
            })
            .collect();
        assert_eq!(found, expected);
    }
}
