use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

/// Lays the image out as a `[1, 3, height, width]` tensor with channels scaled to [0, 1].
/// Images that do not already match the model geometry are stretched to fit.
pub fn image_to_tensor(image: &DynamicImage, width: u32, height: u32) -> Tensor {
    let rgb = if image.width() == width && image.height() == height {
        image.to_rgb8()
    } else {
        image
            .resize_exact(width, height, imageops::FilterType::Triangle)
            .to_rgb8()
    };

    tract_ndarray::Array4::from_shape_fn(
        (1, 3, height as usize, width as usize),
        |(_, c, y, x)| rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
    )
    .into_tensor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};

    #[test]
    fn test_image_to_tensor_channels() {
        // Create a 224x224 red image
        let img = ImageBuffer::from_pixel(224, 224, Rgb([255u8, 0, 0]));
        let image = DynamicImage::ImageRgb8(img);

        let tensor = image_to_tensor(&image, 224, 224);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let slice = tensor.as_slice::<f32>().unwrap();

        // Red plane first, then green, then blue
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[224 * 224], 0.0);
        assert_eq!(slice[2 * 224 * 224], 0.0);
    }

    #[test]
    fn test_image_to_tensor_resizes_mismatched_input() {
        let img = ImageBuffer::from_pixel(300, 100, Rgb([0u8, 255, 0]));
        let image = DynamicImage::ImageRgb8(img);

        let tensor = image_to_tensor(&image, 64, 64);
        assert_eq!(tensor.shape(), &[1, 3, 64, 64]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert!(slice[64 * 64 + 32 * 64 + 32] > 0.98);
    }

    #[test]
    fn test_image_to_tensor_normalization() {
        let img = ImageBuffer::from_pixel(8, 8, Rgb([128u8, 128, 128]));
        let image = DynamicImage::ImageRgb8(img);

        let tensor = image_to_tensor(&image, 8, 8);
        let slice = tensor.as_slice::<f32>().unwrap();

        let expected = 128.0 / 255.0;
        assert!((slice[0] - expected).abs() < 0.0001);
        assert!((slice[8 * 8] - expected).abs() < 0.0001);
        assert!((slice[2 * 8 * 8] - expected).abs() < 0.0001);
    }
}
