use crate::image_source::captured_image::CapturedImage;
use image::{imageops, DynamicImage};

/// Largest centred square of the image.
pub fn center_crop_square(image: &DynamicImage) -> DynamicImage {
    let side = image.width().min(image.height());
    let x = (image.width() - side) / 2;
    let y = (image.height() - side) / 2;

    image.crop_imm(x, y, side, side)
}

/// Uprights the capture, centre-crops it square and scales it to `(height, width)`.
pub fn prepare(
    image: &CapturedImage,
    input_shape: (u32, u32),
) -> Result<DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
    let (height, width) = input_shape;
    let upright = image.upright();

    if upright.width() == 0 || upright.height() == 0 {
        return Err("captured image has no pixels".into());
    }

    Ok(center_crop_square(&upright).resize_exact(width, height, imageops::FilterType::Triangle))
}
