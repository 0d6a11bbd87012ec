use std::collections::HashSet;

use ndarray::{arr2, Array2, ArrayD, IxDyn};
use ndneighborhood::{
    Boundary, EllipseNeighborhood, Neighborhood, NeighborhoodConfig, NeighborhoodCursor,
    OutOfBounds, RectangleNeighborhood, Shape,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
pub fn digits() -> Array2<i32> {
    arr2(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]])
}

#[fixture]
pub fn gradient_32() -> Array2<f32> {
    Array2::from_shape_fn((32, 32), |(row, col)| (row * 32 + col) as f32)
}

#[rstest]
fn test_mirror_values(digits: Array2<i32>) {
    let double =
        RectangleNeighborhood::with_source(digits.view(), OutOfBounds::Mirror(Boundary::Double))
            .unwrap();
    let single =
        RectangleNeighborhood::with_source(digits.view(), OutOfBounds::Mirror(Boundary::Single))
            .unwrap();

    // Double: -1 -> 0, 3 -> 2. Single: -1 -> 1, 3 -> 1.
    assert_eq!(double.core().value_at(&[-1, 3]), Ok(3));
    assert_eq!(single.core().value_at(&[-1, 3]), Ok(5));
    assert_eq!(double.core().value_at(&[1, 1]), Ok(5));
}

#[rstest]
fn test_window_far_outside(digits: Array2<i32>) {
    let mut neighborhood = RectangleNeighborhood::periodic(digits.view()).unwrap();
    neighborhood.set_span(&[1, 1]).unwrap();
    let size_at_origin = neighborhood.size();

    neighborhood.set_position(&[1000, -1000]).unwrap();
    assert_eq!(neighborhood.size(), size_at_origin);

    // Periodic: 999..=1001 -> 0..=2 and -1001..=-999 -> 1, 2, 0.
    let values: Vec<i32> = neighborhood.cursor().collect();
    assert_eq!(values, vec![2, 5, 8, 3, 6, 9, 1, 4, 7]);
}

#[test]
fn test_random_rectangles() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let num_dims = rng.gen_range(1..=4);
        let span: Vec<i64> = (0..num_dims).map(|_| rng.gen_range(0..=3)).collect();
        let center: Vec<i64> = (0..num_dims).map(|_| rng.gen_range(-10..=10)).collect();

        let source = ArrayD::<u16>::zeros(IxDyn(&vec![2; num_dims]));
        let mut neighborhood =
            RectangleNeighborhood::with_source(source.view(), OutOfBounds::Border).unwrap();
        neighborhood.set_span(&span).unwrap();
        neighborhood.set_position(&center).unwrap();

        let positions: Vec<Vec<i64>> = neighborhood.cursor().positions().collect();
        let unique: HashSet<&Vec<i64>> = positions.iter().collect();
        assert_eq!(positions.len() as u64, neighborhood.size());
        assert_eq!(unique.len(), positions.len());
        assert_eq!(neighborhood.cursor().count() as u64, neighborhood.size());
    }
}

#[rstest]
fn test_random_ellipses(gradient_32: Array2<f32>) {
    let mut rng = StdRng::seed_from_u64(7);
    let mut neighborhood =
        EllipseNeighborhood::mirrored(gradient_32.view(), &[0, 0], &[0, 0]).unwrap();
    for _ in 0..50 {
        let span: [i64; 2] = [rng.gen_range(0..=12), rng.gen_range(0..=12)];
        let center: [i64; 2] = [rng.gen_range(-40..=40), rng.gen_range(-40..=40)];
        neighborhood.set_span(&span).unwrap();
        neighborhood.set_position(&center).unwrap();

        let positions: HashSet<Vec<i64>> = neighborhood.cursor().positions().collect();
        assert_eq!(positions.len() as u64, neighborhood.size());
        assert!(positions.contains(&center.to_vec()));
    }
}

#[rstest]
fn test_per_thread_copies(gradient_32: Array2<f32>) {
    let mut neighborhood =
        RectangleNeighborhood::with_source(gradient_32.view(), OutOfBounds::Border).unwrap();
    neighborhood.set_span(&[1, 1]).unwrap();

    let centers: Vec<[i64; 2]> = (0..32)
        .flat_map(|row| (0..32).map(move |col| [row, col]))
        .collect();

    let sequential: Vec<f32> = centers
        .iter()
        .map(|center| {
            neighborhood.set_position(center).unwrap();
            neighborhood.cursor().sum::<f32>()
        })
        .collect();

    let parallel: Vec<f32> = centers
        .par_iter()
        .map_init(
            || neighborhood.copy(),
            |local, center| {
                local.set_position(center).unwrap();
                local.cursor().sum::<f32>()
            },
        )
        .collect();

    assert_eq!(parallel, sequential);
    assert_eq!(sequential[5 * 32 + 5], 9.0 * gradient_32[(5, 5)]);
}

#[rstest]
fn test_config_to_neighborhood(digits: Array2<i32>) {
    let config = NeighborhoodConfig::<i32>::from_json_str(
        r#"{ "shape": "ellipse", "span": [1, 1], "center": [1, 1], "extension": { "constant": 0 } }"#,
    )
    .unwrap();
    let neighborhood = config.build(digits.view().into_dyn()).unwrap();

    assert_eq!(neighborhood.shape(), Shape::Ellipse);
    assert_eq!(neighborhood.size(), 5);
    assert_eq!(neighborhood.cursor().collect::<Vec<_>>(), vec![4, 2, 5, 8, 6]);

    let mut cursor = neighborhood.localizing_cursor();
    let mut position = [0i64; 2];
    cursor.fwd();
    cursor.localize(&mut position);
    assert_eq!(position, [1, 0]);
    assert_eq!(cursor.get_long_position(1), 0);
}
