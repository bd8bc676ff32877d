use crate::image_source::captured_image::CapturedImage;
use crate::image_source::interface::{Capture, ImageSource};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, GrayImage, Luma};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Stands in for the device camera: waits a little, then hands back a noisy grey frame or,
/// now and then, a cancellation.
pub struct ImageSourceFake {
    logger: Arc<dyn Logger + Send + Sync>,
    latency: Duration,
    cancel_probability: f64,
}

impl ImageSourceFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, latency: Duration) -> Self {
        Self {
            logger: logger.with_namespace("image_source").with_namespace("fake"),
            latency,
            cancel_probability: 0.1,
        }
    }

    pub fn with_cancel_probability(mut self, cancel_probability: f64) -> Self {
        self.cancel_probability = cancel_probability.clamp(0.0, 1.0);
        self
    }
}

impl ImageSource for ImageSourceFake {
    fn capture(&self) -> Result<Capture, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Capturing image...")?;
        std::thread::sleep(self.latency);

        let mut rng = rand::rng();

        if rng.random_bool(self.cancel_probability) {
            self.logger.info("Capture cancelled")?;
            return Ok(Capture::Cancelled);
        }

        let frame = GrayImage::from_fn(640, 480, |_, _| Luma([rng.random_range(40..200)]));

        self.logger.info("Image captured")?;

        Ok(Capture::Image(CapturedImage::from(DynamicImage::ImageLuma8(frame))))
    }
}
