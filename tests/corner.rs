use nalgebra as na;

use na::DMatrix;
use rand::{thread_rng, Rng};
use scalespace::corner::{compute_eigenvalues, harris, shi_tomasi, structure_tensor};
use scalespace::image::Image;
use scalespace::image::image_encoding::ImageEncoding;
use scalespace::Float;

fn image_from_buffer(buffer: DMatrix<Float>) -> Image {
    Image::from_matrix(&buffer, ImageEncoding::F64, false)
}

// One bright quadrant whose top-left corner sits at (corner_x, corner_y).
fn corner_image(size: usize, corner_y: usize, corner_x: usize) -> Image {
    let buffer = DMatrix::<Float>::from_fn(size, size, |r,c| {
        if r >= corner_y && c >= corner_x { 1.0 } else { 0.0 }
    });
    image_from_buffer(buffer)
}

#[test]
fn test_uniform_image_has_no_corners() {
    let image = image_from_buffer(DMatrix::<Float>::from_element(20, 20, 0.5));

    assert!(shi_tomasi(&image, 3, 0.01).unwrap().is_empty());
    assert!(harris(&image, 3, 0.035, 0.01).unwrap().is_empty());
}

#[test]
fn test_shi_tomasi_finds_synthetic_corner() {
    let image = corner_image(20, 8, 8);
    let coordinates = shi_tomasi(&image, 3, 0.01).unwrap();

    assert!(!coordinates.is_empty());
    assert!(coordinates.iter().any(|&(x,y)| {
        (x as isize - 8).abs() <= 1 && (y as isize - 8).abs() <= 1
    }));
}

#[test]
fn test_harris_finds_synthetic_corner() {
    let image = corner_image(20, 8, 8);
    let coordinates = harris(&image, 3, 0.035, 0.01).unwrap();

    assert!(!coordinates.is_empty());
    assert!(coordinates.iter().any(|&(x,y)| {
        (x as isize - 8).abs() <= 1 && (y as isize - 8).abs() <= 1
    }));
}

#[test]
fn test_shi_tomasi_ignores_straight_edge() {
    // A straight edge has one vanishing eigenvalue, so the minimum never
    // clears a positive threshold.
    let buffer = DMatrix::<Float>::from_fn(20, 20, |r,_| if r >= 10 { 1.0 } else { 0.0 });
    let image = image_from_buffer(buffer);

    assert!(shi_tomasi(&image, 3, 0.01).unwrap().is_empty());
}

#[test]
fn test_low_amplitude_noise_stays_below_threshold() {
    let mut rng = thread_rng();
    let buffer = DMatrix::<Float>::from_fn(15, 15, |_,_| rng.gen::<Float>()*0.001);
    let image = image_from_buffer(buffer);

    assert!(shi_tomasi(&image, 3, 0.01).unwrap().is_empty());
    assert!(harris(&image, 3, 0.035, 0.01).unwrap().is_empty());
}

#[test]
fn test_coordinates_follow_row_major_scan_order() {
    let buffer = DMatrix::<Float>::from_fn(24, 24, |r,c| {
        let in_block_a = r >= 4 && r < 10 && c >= 4 && c < 10;
        let in_block_b = r >= 14 && r < 20 && c >= 14 && c < 20;
        if in_block_a || in_block_b { 1.0 } else { 0.0 }
    });
    let image = image_from_buffer(buffer);

    let coordinates = shi_tomasi(&image, 3, 0.01).unwrap();
    assert!(coordinates.len() >= 2);
    for pair in coordinates.windows(2) {
        let (x_prev, y_prev) = pair[0];
        let (x_next, y_next) = pair[1];
        assert!(y_prev < y_next || (y_prev == y_next && x_prev < x_next));
    }
}

#[test]
fn test_corner_centers_stay_within_valid_range() {
    let image = corner_image(20, 8, 8);
    let window_size = 3;
    let coordinates = shi_tomasi(&image, window_size, 0.01).unwrap();

    for &(x,y) in &coordinates {
        assert!(x >= window_size/2 && x < 20 - window_size/2);
        assert!(y >= window_size/2 && y < 20 - window_size/2);
    }
}

#[test]
fn test_image_smaller_than_window_yields_empty_result() {
    let image = image_from_buffer(DMatrix::<Float>::from_element(4, 4, 1.0));
    assert!(shi_tomasi(&image, 7, 0.01).unwrap().is_empty());
    assert!(harris(&image, 7, 0.035, 0.01).unwrap().is_empty());
}

#[test]
fn test_zero_window_size_is_rejected() {
    let image = image_from_buffer(DMatrix::<Float>::from_element(10, 10, 1.0));
    assert!(shi_tomasi(&image, 0, 0.01).is_err());
    assert!(harris(&image, 0, 0.035, 0.01).is_err());
}

#[test]
fn test_structure_tensor_is_symmetric_positive_semidefinite() {
    let buffer = DMatrix::<Float>::from_fn(5, 5, |r,c| ((r*3 + c*5) % 7) as Float);
    let window = buffer.view((0,0), (5,5));

    let tensor = structure_tensor(&window).unwrap();
    assert_eq!(tensor[(0,1)], tensor[(1,0)]);

    let eigenvalues = compute_eigenvalues(&window).unwrap();
    assert!(eigenvalues[0] >= -1e-12);
    assert!(eigenvalues[1] >= -1e-12);
}

#[test]
fn test_eigenvalues_of_constant_window_vanish() {
    let buffer = DMatrix::<Float>::from_element(5, 5, 0.3);
    let window = buffer.view((0,0), (5,5));

    let eigenvalues = compute_eigenvalues(&window).unwrap();
    assert!(eigenvalues[0].abs() < 1e-12);
    assert!(eigenvalues[1].abs() < 1e-12);
}
