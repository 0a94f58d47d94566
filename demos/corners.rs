extern crate image as image_rs;
extern crate scalespace;

use std::path::Path;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::Result;
use scalespace::corner;
use scalespace::image::Image;
use scalespace::visualize::draw_points;
use scalespace::Float;

/// Corner detection algorithms
#[derive(Parser)]
#[command(name = "corners")]
struct Args {
    /// Path to the image
    #[arg(long = "image_path", default_value = "chessboard.jpg")]
    image_path: String,

    /// Window size of the filter
    #[arg(long = "window_size", default_value_t = 3)]
    window_size: usize,

    /// Type of algo to be used (shitomasi, harris, both)
    #[arg(long = "method", default_value = "both")]
    method: String,

    /// Weight of the eigenvalue sum in the Harris response
    #[arg(long = "alpha", default_value_t = 0.035)]
    alpha: Float,

    /// Threshold for the cornerness score
    #[arg(long = "threshold", default_value_t = 0.01)]
    threshold: Float,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let method = args.method.to_lowercase();
    if method != "both" && method != "shitomasi" && method != "harris" {
        Args::command().print_help()?;
        println!("Please enter the appropriate option");
        return Ok(());
    }

    let gray_image = image_rs::open(&Path::new(&args.image_path))?.to_luma8();
    let image = Image::from_gray_image(&gray_image, true);

    if method == "both" || method == "shitomasi" {
        let coordinates = corner::shi_tomasi(&image, args.window_size, args.threshold)?;
        let mut display = Image::from_gray_image(&gray_image, false);
        draw_points(&mut display, &coordinates, 255.0);
        display.to_image().save("output/corners_shitomasi.png")?;
    }

    if method == "both" || method == "harris" {
        let coordinates = corner::harris(&image, args.window_size, args.alpha, args.threshold)?;
        let mut display = Image::from_gray_image(&gray_image, false);
        draw_points(&mut display, &coordinates, 255.0);
        display.to_image().save("output/corners_harris.png")?;
    }

    Ok(())
}
