use nalgebra as na;

use na::DMatrix;
use scalespace::filter::{convolve_2d, gaussian_kernel, gaussian_smoothing, laplacian, normalized_gaussian_kernel};
use scalespace::Float;

#[test]
fn test_gaussian_kernel_values_in_unit_interval() {
    let kernel = gaussian_kernel(8, 8, 2.0).unwrap();
    for &value in kernel.iter() {
        assert!(value > 0.0);
        assert!(value <= 1.0);
    }
}

#[test]
fn test_gaussian_kernel_rotation_symmetry_about_computed_center() {
    // Even dimensions, so the computed center is (rows/2, cols/2) and the
    // 180 degree rotation i -> 2*center - i stays inside the array.
    let rows = 8;
    let cols = 6;
    let kernel = gaussian_kernel(rows, cols, 1.5).unwrap();

    for i in 1..rows {
        for j in 1..cols {
            let i_mirrored = 2*(rows/2) - i;
            let j_mirrored = 2*(cols/2) - j;
            assert!((kernel[(i,j)] - kernel[(i_mirrored,j_mirrored)]).abs() < 1e-12);
        }
    }
}

#[test]
fn test_gaussian_kernel_odd_dimension_center_quirk() {
    // For odd dimensions the center computation adds +1, so a 5x5 kernel is
    // centered at 3.5 instead of 2: the peak sits in the lower-right 2x2
    // block, not on the middle cell. Pinned here so the asymmetric rounding
    // is not mistaken for a bug and silently corrected.
    let kernel = gaussian_kernel(5, 5, 1.0).unwrap();

    assert!(kernel[(3,3)] > kernel[(2,2)]);
    assert!((kernel[(3,3)] - kernel[(4,4)]).abs() < 1e-12);
    assert!((kernel[(3,4)] - kernel[(4,3)]).abs() < 1e-12);
}

#[test]
fn test_normalized_gaussian_kernel_sums_to_one() {
    for &(rows, cols, sigma) in &[(3usize, 3usize, 1.0), (8, 8, 2.5), (7, 5, 0.8)] {
        let kernel = normalized_gaussian_kernel(rows, cols, sigma).unwrap();
        assert!((kernel.sum() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_non_positive_sigma_is_rejected() {
    assert!(gaussian_kernel(4, 4, 0.0).is_err());
    assert!(gaussian_kernel(4, 4, -1.0).is_err());
    assert!(normalized_gaussian_kernel(4, 4, -0.5).is_err());
    assert!(gaussian_smoothing(&DMatrix::<Float>::zeros(4,4), 0.0).is_err());
}

#[test]
fn test_zero_dimension_is_rejected() {
    assert!(gaussian_kernel(0, 4, 1.0).is_err());
    assert!(gaussian_kernel(4, 0, 1.0).is_err());
}

#[test]
fn test_gaussian_smoothing_preserves_constant_buffer() {
    let buffer = DMatrix::<Float>::from_element(12, 12, 0.7);
    let smoothed = gaussian_smoothing(&buffer, 1.5).unwrap();
    for &value in smoothed.iter() {
        assert!((value - 0.7).abs() < 1e-9);
    }
}

#[test]
fn test_laplacian_of_constant_buffer_is_zero() {
    let buffer = DMatrix::<Float>::from_element(10, 10, 3.0);
    let response = laplacian(&buffer);
    for &value in response.iter() {
        assert_eq!(value, 0.0);
    }
}

#[test]
fn test_convolve_2d_with_identity_kernel() {
    let buffer = DMatrix::<Float>::from_fn(6, 6, |r,c| (r*7 + c) as Float);
    let kernel = DMatrix::<Float>::from_element(1, 1, 1.0);
    let convolved = convolve_2d(&buffer, &kernel);
    assert_eq!(convolved, buffer);
}
