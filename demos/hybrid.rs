extern crate image as image_rs;
extern crate scalespace;

use std::path::Path;

use color_eyre::eyre::Result;
use scalespace::frequency;
use scalespace::image::Image;

fn main() -> Result<()> {
    color_eyre::install()?;

    let low_image_path = "images/cat.bmp";
    let high_image_path = "images/dog.bmp";
    let sigma_low = 50.0;
    let sigma_high = 0.5;

    let gray_low = image_rs::open(&Path::new(low_image_path))?.to_luma8();
    let gray_high = image_rs::open(&Path::new(high_image_path))?.to_luma8();
    let image_low = Image::from_gray_image(&gray_low, false);
    let image_high = Image::from_gray_image(&gray_high, false);

    let low = frequency::low_pass(&image_low, sigma_low)?;
    let high = frequency::high_pass(&image_high, sigma_high)?;
    let hybrid = frequency::hybrid(&image_low, &image_high, sigma_low, sigma_high)?;

    low.to_image().save("output/hybrid_low.png")?;
    high.to_image().save("output/hybrid_high.png")?;
    hybrid.to_image().save("output/hybrid.png")?;

    Ok(())
}
