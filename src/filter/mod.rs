extern crate nalgebra as na;

use color_eyre::eyre::{eyre, Result};
use na::DMatrix;

use crate::Float;

// Center of a kernel axis: dim/2 in float, plus one when the dimension is
// odd. The odd case lands the center past the true midpoint, see the
// gaussian_kernel docs.
fn kernel_center(dim: usize) -> Float {
    let center = (dim as Float)/2.0;
    match dim % 2 {
        0 => center,
        _ => center + 1.0
    }
}

/// Unnormalized 2D Gaussian weight array of the given shape.
///
/// Cell (i,j) holds exp(-((i-cx)^2 + (j-cy)^2)/(2*sigma^2)) where (cx,cy)
/// is the computed center. Note the center computation adds +1 on odd
/// dimensions, so odd kernels are not centered on their middle cell. The
/// offset is intentional and must not be silently corrected; the frequency
/// masks rely on it.
pub fn gaussian_kernel(rows: usize, cols: usize, sigma: Float) -> Result<DMatrix<Float>> {
    if sigma <= 0.0 {
        return Err(eyre!("gaussian_kernel: sigma must be positive, got {}", sigma));
    }
    if rows == 0 || cols == 0 {
        return Err(eyre!("gaussian_kernel: dimensions must be positive, got ({},{})", rows, cols));
    }

    let center_x = kernel_center(rows);
    let center_y = kernel_center(cols);
    let denom = 2.0*sigma.powi(2);

    let mut kernel = DMatrix::<Float>::zeros(rows,cols);
    for i in 0..rows {
        for j in 0..cols {
            let distance_squared = ((i as Float) - center_x).powi(2) + ((j as Float) - center_y).powi(2);
            kernel[(i,j)] = (-distance_squared/denom).exp();
        }
    }

    Ok(kernel)
}

/// Gaussian weights normalized to sum to one, for smoothing use.
pub fn normalized_gaussian_kernel(rows: usize, cols: usize, sigma: Float) -> Result<DMatrix<Float>> {
    let mut kernel = gaussian_kernel(rows,cols,sigma)?;
    let sum = kernel.sum();
    for elem in kernel.iter_mut() {
        *elem = *elem/sum;
    }
    Ok(kernel)
}

/// Dense 2D correlation of a buffer with a kernel. Samples outside the
/// buffer are clamped to the nearest edge pixel. The kernel is anchored at
/// the truncated computed center.
pub fn convolve_2d(buffer: &DMatrix<Float>, kernel: &DMatrix<Float>) -> DMatrix<Float> {
    let height = buffer.nrows();
    let width = buffer.ncols();
    let kernel_rows = kernel.nrows();
    let kernel_cols = kernel.ncols();
    let anchor_r = (kernel_center(kernel_rows).trunc() as usize).min(kernel_rows - 1) as isize;
    let anchor_c = (kernel_center(kernel_cols).trunc() as usize).min(kernel_cols - 1) as isize;

    let mut target = DMatrix::<Float>::zeros(height,width);
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for ki in 0..kernel_rows {
                for kj in 0..kernel_cols {
                    let sample_y = clamp_index((y as isize) + (ki as isize) - anchor_r, height);
                    let sample_x = clamp_index((x as isize) + (kj as isize) - anchor_c, width);
                    acc += kernel[(ki,kj)]*buffer[(sample_y,sample_x)];
                }
            }
            target[(y,x)] = acc;
        }
    }
    target
}

fn clamp_index(index: isize, dim: usize) -> usize {
    match index {
        index if index < 0 => 0,
        index if index >= dim as isize => dim - 1,
        _ => index as usize
    }
}

/// Gaussian smoothing at the given sigma. The kernel extends four standard
/// deviations each way from its center.
pub fn gaussian_smoothing(buffer: &DMatrix<Float>, sigma: Float) -> Result<DMatrix<Float>> {
    if sigma <= 0.0 {
        return Err(eyre!("gaussian_smoothing: sigma must be positive, got {}", sigma));
    }
    let radius = (4.0*sigma + 0.5).trunc() as usize;
    let size = 2*radius + 1;
    let kernel = normalized_gaussian_kernel(size,size,sigma)?;
    Ok(convolve_2d(buffer,&kernel))
}

// [1,-2,1] second difference along each axis, summed. Border samples clamp
// to the edge so the Laplacian of a constant buffer is exactly zero there.
pub fn laplacian(buffer: &DMatrix<Float>) -> DMatrix<Float> {
    let height = buffer.nrows();
    let width = buffer.ncols();

    let mut target = DMatrix::<Float>::zeros(height,width);
    for y in 0..height {
        for x in 0..width {
            let center = buffer[(y,x)];
            let left = buffer[(y,clamp_index(x as isize - 1, width))];
            let right = buffer[(y,clamp_index(x as isize + 1, width))];
            let up = buffer[(clamp_index(y as isize - 1, height),x)];
            let down = buffer[(clamp_index(y as isize + 1, height),x)];
            target[(y,x)] = left + right + up + down - 4.0*center;
        }
    }
    target
}
