extern crate nalgebra as na;

use std::time::Instant;

use color_eyre::eyre::{eyre, Result};
use na::DMatrix;
use serde::{Serialize, Deserialize};

use crate::{Blob, ExtremaParameters, Float};
use crate::image::Image;
use crate::filter::{gaussian_smoothing, laplacian};

pub const LOG_THRESHOLD_ABS: Float = 0.2;
pub const DOG_THRESHOLD_ABS: Float = 0.1;
pub const THRESHOLD_REL: Float = 0.0;
pub const PRUNE_OVERLAP: Float = 0.5;

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct LogParameters {
    pub min_sigma: Float,
    pub max_sigma: Float,
    pub num_sigma: usize
}

impl Default for LogParameters {
    fn default() -> LogParameters {
        LogParameters {
            min_sigma: 1.0,
            max_sigma: 15.0,
            num_sigma: 10
        }
    }
}

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct DogParameters {
    pub min_sigma: Float,
    pub max_sigma: Float,
    pub sigma_ratio: Float
}

impl Default for DogParameters {
    fn default() -> DogParameters {
        DogParameters {
            min_sigma: 1.0,
            max_sigma: 30.0,
            sigma_ratio: 1.6
        }
    }
}

/// Filter responses stacked along the scale axis, one layer per sigma.
#[derive(Debug,Clone)]
pub struct ScaleSpace {
    pub layers: Vec<DMatrix<Float>>,
    pub sigmas: Vec<Float>
}

/// Blob detection via scale-normalized Laplacian-of-Gaussian responses over
/// linearly spaced sigmas. Returns pruned blobs, possibly none.
pub fn laplacian_of_gaussian(image: &Image, parameters: &LogParameters) -> Result<Vec<Blob>> {
    validate_image(image)?;
    if parameters.num_sigma == 0 {
        return Err(eyre!("laplacian_of_gaussian: num_sigma must be positive"));
    }
    if parameters.min_sigma >= parameters.max_sigma {
        return Err(eyre!("laplacian_of_gaussian: min_sigma {} must be below max_sigma {}",
            parameters.min_sigma, parameters.max_sigma));
    }

    println!("Laplacian of Gaussian blob detection");
    let start = Instant::now();

    let sigmas = linear_sigmas(parameters.min_sigma, parameters.max_sigma, parameters.num_sigma);
    let mut layers = Vec::<DMatrix<Float>>::with_capacity(sigmas.len());
    for &sigma in &sigmas {
        let smoothed = gaussian_smoothing(&image.buffer, sigma)?;
        let response = laplacian(&smoothed).map(|v| -v*sigma.powi(2));
        layers.push(response);
    }
    let stack = ScaleSpace {layers, sigmas};

    let extrema = detect_scale_space_extrema(&stack, LOG_THRESHOLD_ABS, THRESHOLD_REL);
    let blobs = blobs_from_extrema(&extrema, &stack);
    let pruned = prune_blobs(&blobs, PRUNE_OVERLAP);

    println!("Blobs detected: {}", pruned.len());
    println!("Total time: {}s", start.elapsed().as_secs_f64());
    Ok(pruned)
}

/// Blob detection via differences of Gaussian-smoothed images over a
/// geometric sigma progression. Returns pruned blobs, possibly none.
pub fn difference_of_gaussian(image: &Image, parameters: &DogParameters) -> Result<Vec<Blob>> {
    validate_image(image)?;
    if parameters.sigma_ratio <= 1.0 {
        return Err(eyre!("difference_of_gaussian: sigma_ratio must exceed 1, got {}", parameters.sigma_ratio));
    }
    if parameters.min_sigma >= parameters.max_sigma {
        return Err(eyre!("difference_of_gaussian: min_sigma {} must be below max_sigma {}",
            parameters.min_sigma, parameters.max_sigma));
    }

    println!("Difference of Gaussian blob detection");
    let start = Instant::now();

    let k = dog_layer_count(parameters.min_sigma, parameters.max_sigma, parameters.sigma_ratio);
    let sigmas: Vec<Float> = (0..k+1).map(|i| parameters.min_sigma*parameters.sigma_ratio.powi(i as i32)).collect();

    let mut smoothed = Vec::<DMatrix<Float>>::with_capacity(sigmas.len());
    for &sigma in &sigmas {
        smoothed.push(gaussian_smoothing(&image.buffer, sigma)?);
    }

    let mut layers = Vec::<DMatrix<Float>>::with_capacity(k);
    for i in 0..k {
        layers.push(&smoothed[i] - &smoothed[i+1]);
    }
    // Layer i keeps the lower sigma of the pair that produced it.
    let layer_sigmas = sigmas[0..k].to_vec();
    let stack = ScaleSpace {layers, sigmas: layer_sigmas};

    let extrema = detect_scale_space_extrema(&stack, DOG_THRESHOLD_ABS, THRESHOLD_REL);
    let blobs = blobs_from_extrema(&extrema, &stack);
    let pruned = prune_blobs(&blobs, PRUNE_OVERLAP);

    println!("Blobs detected: {}", pruned.len());
    println!("Total time: {}s", start.elapsed().as_secs_f64());
    Ok(pruned)
}

/// Number of difference layers: floor(log(max/min, ratio)) + 1.
pub fn dog_layer_count(min_sigma: Float, max_sigma: Float, sigma_ratio: Float) -> usize {
    ((max_sigma/min_sigma).log(sigma_ratio)).trunc() as usize + 1
}

/// 3D local maxima of the stack over a 3x3x3 neighborhood. The neighborhood
/// is clipped at the volume borders and plateau samples count as maxima. A
/// sample qualifies when it is at least every neighbor and above both the
/// absolute threshold and the relative fraction of the global maximum.
pub fn detect_scale_space_extrema(stack: &ScaleSpace, threshold_abs: Float, threshold_rel: Float) -> Vec<ExtremaParameters> {
    let mut extrema_vec = Vec::<ExtremaParameters>::new();
    if stack.layers.is_empty() {
        return extrema_vec;
    }

    let height = stack.layers[0].nrows();
    let width = stack.layers[0].ncols();
    let depth = stack.layers.len();

    let global_max = stack.layers.iter().map(|layer| layer.max()).fold(Float::MIN, Float::max);
    let threshold = threshold_abs.max(threshold_rel*global_max);

    for sigma_level in 0..depth {
        for y in 0..height {
            for x in 0..width {
                let sample = stack.layers[sigma_level][(y,x)];
                if sample <= threshold {
                    continue;
                }

                let mut is_maximum = true;
                'neighbourhood: for s in sigma_level.saturating_sub(1)..(sigma_level+2).min(depth) {
                    for ny in y.saturating_sub(1)..(y+2).min(height) {
                        for nx in x.saturating_sub(1)..(x+2).min(width) {
                            if s == sigma_level && ny == y && nx == x {
                                continue;
                            }
                            if stack.layers[s][(ny,nx)] > sample {
                                is_maximum = false;
                                break 'neighbourhood;
                            }
                        }
                    }
                }

                if is_maximum {
                    extrema_vec.push(ExtremaParameters{x,y,sigma_level});
                }
            }
        }
    }

    extrema_vec
}

/// Discards detections whose disks (radius sigma*sqrt(2)) overlap another
/// detection by more than the given fraction, keeping the larger disk of
/// each offending pair. The first-listed blob survives a tie, so output is
/// deterministic for identical input and the operation is idempotent.
pub fn prune_blobs(blobs: &[Blob], overlap_threshold: Float) -> Vec<Blob> {
    let mut retained = blobs.to_vec();

    for i in 0..retained.len() {
        for j in i+1..retained.len() {
            if retained[i].sigma <= 0.0 || retained[j].sigma <= 0.0 {
                continue;
            }
            if blob_overlap(&retained[i], &retained[j]) > overlap_threshold {
                if retained[j].radius() > retained[i].radius() {
                    retained[i].sigma = 0.0;
                } else {
                    retained[j].sigma = 0.0;
                }
            }
        }
    }

    retained.into_iter().filter(|blob| blob.sigma > 0.0).collect()
}

/// Fraction of the smaller disk covered by the intersection of two blob
/// disks. Zero when disjoint, one when the smaller disk is contained.
pub fn blob_overlap(a: &Blob, b: &Blob) -> Float {
    let r1 = a.radius();
    let r2 = b.radius();
    let distance = ((a.y - b.y).powi(2) + (a.x - b.x).powi(2)).sqrt();

    if distance > r1 + r2 {
        return 0.0;
    }
    if distance <= (r1 - r2).abs() {
        return 1.0;
    }

    let ratio1 = ((distance.powi(2) + r1.powi(2) - r2.powi(2))/(2.0*distance*r1)).clamp(-1.0,1.0);
    let ratio2 = ((distance.powi(2) + r2.powi(2) - r1.powi(2))/(2.0*distance*r2)).clamp(-1.0,1.0);
    let lens_term = (-distance + r1 + r2)*(distance + r1 - r2)*(distance - r1 + r2)*(distance + r1 + r2);
    let lens_area = r1.powi(2)*ratio1.acos() + r2.powi(2)*ratio2.acos() - 0.5*lens_term.abs().sqrt();

    let min_radius = r1.min(r2);
    lens_area/(crate::float::consts::PI*min_radius.powi(2))
}

fn blobs_from_extrema(extrema: &[ExtremaParameters], stack: &ScaleSpace) -> Vec<Blob> {
    extrema.iter().map(|e| Blob {
        y: e.y as Float,
        x: e.x as Float,
        sigma: stack.sigmas[e.sigma_level]
    }).collect()
}

fn linear_sigmas(min_sigma: Float, max_sigma: Float, num_sigma: usize) -> Vec<Float> {
    match num_sigma {
        1 => vec![min_sigma],
        _ => {
            let step = (max_sigma - min_sigma)/((num_sigma - 1) as Float);
            (0..num_sigma).map(|i| min_sigma + step*(i as Float)).collect()
        }
    }
}

fn validate_image(image: &Image) -> Result<()> {
    if image.buffer.nrows() == 0 || image.buffer.ncols() == 0 {
        return Err(eyre!("blob detection: image must be non-empty, got ({},{})",
            image.buffer.nrows(), image.buffer.ncols()));
    }
    Ok(())
}
