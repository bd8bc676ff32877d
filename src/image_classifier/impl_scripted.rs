use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    Classifications(Vec<Classification>),
    Error(String),
    Panic(String),
}

/// Plays back outcomes in order, one per call, each after its own delay. Once the script
/// runs out the last outcome repeats; an empty script returns no candidates. Every image it
/// is handed is kept for inspection.
pub struct ImageClassifierScripted {
    logger: Arc<dyn Logger + Send + Sync>,
    script: Mutex<Vec<(Duration, ScriptedOutcome)>>,
    seen: Mutex<Vec<DynamicImage>>,
    calls: AtomicUsize,
}

impl ImageClassifierScripted {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        script: Vec<(Duration, ScriptedOutcome)>,
    ) -> Self {
        Self {
            logger: logger
                .with_namespace("image_classifier")
                .with_namespace("scripted"),
            script: Mutex::new(script),
            seen: Mutex::new(vec![]),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<DynamicImage> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next(&self) -> Option<(Duration, ScriptedOutcome)> {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        if script.len() > 1 {
            Some(script.remove(0))
        } else {
            script.first().cloned()
        }
    }
}

impl ImageClassifier for ImageClassifierScripted {
    fn classify(
        &self,
        image: &DynamicImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        // Claimed before the call is counted.
        let next = self.next();
        self.seen
            .lock()
            .map_err(|e| e.to_string())?
            .push(image.clone());
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        self.logger.info(&format!(
            "Classifying {}x{} image (call {})",
            image.width(),
            image.height(),
            call
        ))?;

        let Some((delay, outcome)) = next else {
            return Ok(vec![]);
        };
        std::thread::sleep(delay);

        match outcome {
            ScriptedOutcome::Classifications(classifications) => Ok(classifications),
            ScriptedOutcome::Error(message) => Err(message.into()),
            ScriptedOutcome::Panic(message) => panic!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;

    fn blank() -> DynamicImage {
        DynamicImage::new_rgb8(4, 4)
    }

    #[test]
    fn test_plays_in_order_then_repeats_last() {
        let classifier = ImageClassifierScripted::new(
            Arc::new(LoggerFake::new()),
            vec![
                (
                    Duration::ZERO,
                    ScriptedOutcome::Classifications(vec![Classification::new("Normal", 0.9)]),
                ),
                (Duration::ZERO, ScriptedOutcome::Error("boom".to_string())),
            ],
        );

        assert_eq!(
            classifier.classify(&blank()).unwrap(),
            vec![Classification::new("Normal", 0.9)]
        );
        assert_eq!(classifier.classify(&blank()).unwrap_err().to_string(), "boom");
        assert_eq!(classifier.classify(&blank()).unwrap_err().to_string(), "boom");
        assert_eq!(classifier.calls(), 3);
        assert_eq!(classifier.seen().len(), 3);
    }

    #[test]
    fn test_empty_script_returns_nothing() {
        let classifier = ImageClassifierScripted::new(Arc::new(LoggerFake::new()), vec![]);

        assert!(classifier.classify(&blank()).unwrap().is_empty());
    }
}
