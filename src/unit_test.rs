use ndarray::{Array2, Array3};
use rstest::fixture;

/// 4x4 image whose value is `row * 4 + col`.
#[fixture]
pub fn ramp_4x4() -> Array2<i32> {
    Array2::from_shape_fn((4, 4), |(row, col)| (row * 4 + col) as i32)
}

#[fixture]
pub fn ramp_3x4x5() -> Array3<i32> {
    Array3::from_shape_fn((3, 4, 5), |(i, j, k)| (i * 20 + j * 5 + k) as i32)
}
