extern crate image as image_rs;
extern crate scalespace;

use std::fs;
use std::path::Path;

use clap::Parser;
use color_eyre::eyre::Result;
use serde::{Serialize, Deserialize};
use scalespace::blob::{self, DogParameters, LogParameters};
use scalespace::image::Image;
use scalespace::visualize::draw_circle;

#[derive(Debug,Default,Serialize,Deserialize)]
struct BlobRunConfig {
    #[serde(default)]
    log: LogParameters,
    #[serde(default)]
    dog: DogParameters
}

/// Blob detection via scale-space extrema
#[derive(Parser)]
#[command(name = "blobs")]
struct Args {
    /// Path to the image
    #[arg(long = "image_path", default_value = "butterfly.jpg")]
    image_path: String,

    /// Optional YAML file with detector parameters
    #[arg(long = "config")]
    config: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config: BlobRunConfig = match &args.config {
        Some(path) => serde_yaml::from_str(&fs::read_to_string(path)?)?,
        None => BlobRunConfig::default()
    };

    let gray_image = image_rs::open(&Path::new(&args.image_path))?.to_luma8();
    let image = Image::from_gray_image(&gray_image, false);

    let blobs_log = blob::laplacian_of_gaussian(&image, &config.log)?;
    let blobs_dog = blob::difference_of_gaussian(&image, &config.dog)?;

    let mut display_log = Image::from_gray_image(&gray_image, false);
    for detection in &blobs_log {
        draw_circle(&mut display_log, detection.x as usize, detection.y as usize, detection.radius(), 255.0);
    }
    display_log.to_image().save("output/blobs_log.png")?;

    let mut display_dog = Image::from_gray_image(&gray_image, false);
    for detection in &blobs_dog {
        draw_circle(&mut display_dog, detection.x as usize, detection.y as usize, detection.radius(), 255.0);
    }
    display_dog.to_image().save("output/blobs_dog.png")?;

    Ok(())
}
