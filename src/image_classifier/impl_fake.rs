use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::sync::Arc;
use std::time::Duration;

pub struct ImageClassifierFake {
    logger: Arc<dyn Logger + Send + Sync>,
    latency: Duration,
}

impl ImageClassifierFake {
    /// Picks "Normal" or "Abnormal" at random.
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, latency: Duration) -> Self {
        Self {
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
            latency,
        }
    }

    fn random_classifications(&self) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let mut rng = rand::rng();

        let confidence_dist = Uniform::new(0.5, 1.0)?;
        let top = confidence_dist.sample(&mut rng);

        let (first, second) = if Uniform::new(0, 2)?.sample(&mut rng) == 0 {
            ("Normal", "Abnormal")
        } else {
            ("Abnormal", "Normal")
        };

        Ok(vec![
            Classification::new(first, top),
            Classification::new(second, 1.0 - top),
        ])
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!(
            "Classifying {}x{} image with fake classifier...",
            image.width(),
            image.height()
        ))?;

        std::thread::sleep(self.latency);

        self.random_classifications()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    #[test]
    fn test_random_is_ranked() {
        let classifier = ImageClassifierFake::new(Arc::new(LoggerFake::new()), Duration::ZERO);

        let classifications = classifier.classify(&DynamicImage::new_rgb8(4, 4)).unwrap();

        assert_eq!(classifications.len(), 2);
        assert!(classifications[0].confidence >= classifications[1].confidence);
        let total: f32 = classifications.iter().map(|c| c.confidence).sum();
        assert!((total - 1.0).abs() < 1e-5);
    }
}
