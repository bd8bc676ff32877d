use crate::image_source::captured_image::CapturedImage;
use crate::image_source::interface::{Capture, ImageSource};
use crate::library::logger::interface::Logger;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Hands out queued image files one per capture. An empty queue reads as the user backing
/// out of the camera.
pub struct ImageSourceFile {
    logger: Arc<dyn Logger + Send + Sync>,
    queue: Mutex<VecDeque<PathBuf>>,
}

impl ImageSourceFile {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, paths: Vec<PathBuf>) -> Self {
        Self {
            logger: logger.with_namespace("image_source").with_namespace("file"),
            queue: Mutex::new(paths.into()),
        }
    }

    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.queue.lock().map(|queue| queue.len()).unwrap_or(0)
    }
}

pub fn load_captured_image(
    path: &Path,
) -> Result<CapturedImage, Box<dyn std::error::Error + Send + Sync>> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let bitmap = DynamicImage::from_decoder(decoder)?;

    Ok(CapturedImage::new(bitmap, orientation))
}

impl ImageSource for ImageSourceFile {
    fn capture(&self) -> Result<Capture, Box<dyn std::error::Error + Send + Sync>> {
        let next = self.queue.lock().map_err(|e| e.to_string())?.pop_front();

        let Some(path) = next else {
            self.logger.info("No images left to capture")?;
            return Ok(Capture::Cancelled);
        };

        self.logger
            .info(&format!("Loading image {}", path.display()))?;

        let image = load_captured_image(&path)?;

        self.logger.info(&format!(
            "Loaded {}x{} image ({:?})",
            image.bitmap().width(),
            image.bitmap().height(),
            image.orientation()
        ))?;

        Ok(Capture::Image(image))
    }
}
