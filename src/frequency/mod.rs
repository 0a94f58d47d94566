extern crate nalgebra as na;

use color_eyre::eyre::{eyre, Result};
use na::DMatrix;
use rustfft::FftPlanner;
use num_complex::Complex;

use crate::Float;
use crate::image::Image;
use crate::filter::gaussian_kernel;

/// Suppresses high frequencies by multiplying the centered spectrum with a
/// raw Gaussian mask built at the image's own dimensions.
pub fn low_pass(image: &Image, sigma: Float) -> Result<Image> {
    let mask = gaussian_kernel(image.buffer.nrows(),image.buffer.ncols(),sigma)?;
    let filtered = apply_frequency_mask(&image.buffer,&mask);
    Ok(Image::from_matrix(&filtered,image.original_encoding,false))
}

/// Complement of low_pass: the spectrum is weighted by one minus the mask.
pub fn high_pass(image: &Image, sigma: Float) -> Result<Image> {
    let mut mask = gaussian_kernel(image.buffer.nrows(),image.buffer.ncols(),sigma)?;
    for elem in mask.iter_mut() {
        *elem = 1.0 - *elem;
    }
    let filtered = apply_frequency_mask(&image.buffer,&mask);
    Ok(Image::from_matrix(&filtered,image.original_encoding,false))
}

/// Elementwise sum of a low-pass of the first image and a high-pass of the
/// second. Both images must share identical dimensions.
pub fn hybrid(image_low: &Image, image_high: &Image, sigma_low: Float, sigma_high: Float) -> Result<Image> {
    if image_low.buffer.shape() != image_high.buffer.shape() {
        return Err(eyre!("hybrid: image dimensions differ, {:?} vs {:?}",
            image_low.buffer.shape(), image_high.buffer.shape()));
    }

    let low = low_pass(image_low,sigma_low)?;
    let high = high_pass(image_high,sigma_high)?;
    let buffer = &low.buffer + &high.buffer;
    Ok(Image::from_matrix(&buffer,image_low.original_encoding,false))
}

fn apply_frequency_mask(buffer: &DMatrix<Float>, mask: &DMatrix<Float>) -> DMatrix<Float> {
    let spectrum = fft_2d(buffer);
    let mut shifted = fft_shift(&spectrum);
    for (elem, weight) in shifted.iter_mut().zip(mask.iter()) {
        *elem = *elem*(*weight);
    }
    let unshifted = ifft_shift(&shifted);
    let restored = ifft_2d(&unshifted);
    restored.map(|c| c.re)
}

fn fft_2d(buffer: &DMatrix<Float>) -> DMatrix<Complex<Float>> {
    let mut spectrum = buffer.map(|v| Complex::new(v,0.0));
    transform_2d(&mut spectrum, true);
    spectrum
}

fn ifft_2d(spectrum: &DMatrix<Complex<Float>>) -> DMatrix<Complex<Float>> {
    let mut restored = spectrum.clone();
    transform_2d(&mut restored, false);
    let scale = (restored.nrows()*restored.ncols()) as Float;
    restored.map(|c| c/scale)
}

fn transform_2d(data: &mut DMatrix<Complex<Float>>, forward: bool) {
    let height = data.nrows();
    let width = data.ncols();
    let mut planner = FftPlanner::<Float>::new();
    let row_fft = match forward {
        true => planner.plan_fft_forward(width),
        false => planner.plan_fft_inverse(width)
    };
    let col_fft = match forward {
        true => planner.plan_fft_forward(height),
        false => planner.plan_fft_inverse(height)
    };

    let mut scratch = vec![Complex::new(0.0,0.0); width.max(height)];

    for r in 0..height {
        for c in 0..width {
            scratch[c] = data[(r,c)];
        }
        row_fft.process(&mut scratch[0..width]);
        for c in 0..width {
            data[(r,c)] = scratch[c];
        }
    }

    for c in 0..width {
        for r in 0..height {
            scratch[r] = data[(r,c)];
        }
        col_fft.process(&mut scratch[0..height]);
        for r in 0..height {
            data[(r,c)] = scratch[r];
        }
    }
}

// numpy convention: fftshift rolls by dim/2, ifftshift by dim - dim/2.
fn fft_shift(data: &DMatrix<Complex<Float>>) -> DMatrix<Complex<Float>> {
    roll(data, data.nrows()/2, data.ncols()/2)
}

fn ifft_shift(data: &DMatrix<Complex<Float>>) -> DMatrix<Complex<Float>> {
    roll(data, data.nrows() - data.nrows()/2, data.ncols() - data.ncols()/2)
}

fn roll(data: &DMatrix<Complex<Float>>, shift_r: usize, shift_c: usize) -> DMatrix<Complex<Float>> {
    let height = data.nrows();
    let width = data.ncols();
    let mut target = DMatrix::<Complex<Float>>::zeros(height,width);
    for r in 0..height {
        for c in 0..width {
            target[((r + shift_r) % height, (c + shift_c) % width)] = data[(r,c)];
        }
    }
    target
}
