extern crate nalgebra as na;

use std::time::Instant;

use color_eyre::eyre::{eyre, Result};
use na::{DMatrix, DMatrixView, Matrix2, Vector2};

use crate::Float;
use crate::image::Image;
use crate::filter::normalized_gaussian_kernel;

// Sigma of the per-window weighting kernel.
const WINDOW_KERNEL_SIGMA: Float = 1.0;

/// Gaussian-weighted second-moment matrix of a square window.
///
/// Gradients are central differences over the window interior with one-sided
/// differences at the window edges.
pub fn structure_tensor(window: &DMatrixView<Float>) -> Result<Matrix2<Float>> {
    let side = window.nrows();
    if side != window.ncols() {
        return Err(eyre!("structure_tensor: window must be square, got ({},{})", window.nrows(), window.ncols()));
    }
    if side == 0 {
        return Err(eyre!("structure_tensor: window must be non-empty"));
    }

    let (gx, gy) = window_gradients(window);
    let kernel = normalized_gaussian_kernel(side,side,WINDOW_KERNEL_SIGMA)?;

    let mut tensor = Matrix2::<Float>::zeros();
    for r in 0..side {
        for c in 0..side {
            let weight = kernel[(r,c)];
            let gx_rc = gx[(r,c)];
            let gy_rc = gy[(r,c)];
            tensor += weight*Matrix2::new(gx_rc*gx_rc, gx_rc*gy_rc,
                                          gy_rc*gx_rc, gy_rc*gy_rc);
        }
    }

    Ok(tensor)
}

/// Eigenvalues of the window's structure tensor. No ordering is guaranteed;
/// callers must treat the pair as unordered.
pub fn compute_eigenvalues(window: &DMatrixView<Float>) -> Result<Vector2<Float>> {
    let tensor = structure_tensor(window)?;
    Ok(tensor.symmetric_eigenvalues())
}

/// Shi-Tomasi detection: a window center is a corner iff the smaller
/// eigenvalue of its structure tensor exceeds the threshold. Coordinates are
/// (x,y) in row-major scan order over the valid window positions.
pub fn shi_tomasi(image: &Image, window_size: usize, threshold: Float) -> Result<Vec<(usize,usize)>> {
    println!("Shi-Tomasi corner detection");
    detect_corners(image, window_size, &|eigenvalues| eigenvalues.min() > threshold)
}

/// Harris detection with the response R = l1*l2 + alpha*(l1 + l2). The
/// formula is order-independent in the eigenvalues.
pub fn harris(image: &Image, window_size: usize, alpha: Float, threshold: Float) -> Result<Vec<(usize,usize)>> {
    println!("Harris corner detection");
    detect_corners(image, window_size, &|eigenvalues| {
        let response = eigenvalues[0]*eigenvalues[1] + alpha*(eigenvalues[0] + eigenvalues[1]);
        response > threshold
    })
}

fn detect_corners(image: &Image, window_size: usize, is_corner: &dyn Fn(&Vector2<Float>) -> bool) -> Result<Vec<(usize,usize)>> {
    if window_size == 0 {
        return Err(eyre!("detect_corners: window size must be positive"));
    }

    let start = Instant::now();
    let height = image.buffer.nrows();
    let width = image.buffer.ncols();
    let mut coordinates = Vec::<(usize,usize)>::new();

    // An image smaller than the window has no valid positions.
    if height >= window_size && width >= window_size {
        let half_window = window_size/2;
        for row in 0..height-window_size+1 {
            for col in 0..width-window_size+1 {
                let window = image.buffer.view((row,col),(window_size,window_size));
                let eigenvalues = compute_eigenvalues(&window)?;
                if is_corner(&eigenvalues) {
                    coordinates.push((col + half_window, row + half_window));
                }
            }
        }
    }

    println!("Corners detected: {}", coordinates.len());
    println!("Total time: {}s", start.elapsed().as_secs_f64());
    Ok(coordinates)
}

fn window_gradients(window: &DMatrixView<Float>) -> (DMatrix<Float>, DMatrix<Float>) {
    let rows = window.nrows();
    let cols = window.ncols();
    let mut gx = DMatrix::<Float>::zeros(rows,cols);
    let mut gy = DMatrix::<Float>::zeros(rows,cols);

    if cols >= 2 {
        for r in 0..rows {
            gx[(r,0)] = window[(r,1)] - window[(r,0)];
            gx[(r,cols-1)] = window[(r,cols-1)] - window[(r,cols-2)];
            for c in 1..cols-1 {
                gx[(r,c)] = (window[(r,c+1)] - window[(r,c-1)])/2.0;
            }
        }
    }

    if rows >= 2 {
        for c in 0..cols {
            gy[(0,c)] = window[(1,c)] - window[(0,c)];
            gy[(rows-1,c)] = window[(rows-1,c)] - window[(rows-2,c)];
            for r in 1..rows-1 {
                gy[(r,c)] = (window[(r+1,c)] - window[(r-1,c)])/2.0;
            }
        }
    }

    (gx, gy)
}
