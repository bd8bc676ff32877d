use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::image_source::captured_image::CapturedImage;
use crate::image_source::interface::ImageSource;
use crate::inference_pipeline::core::{Effect, Msg};
use crate::inference_pipeline::preprocess::prepare;
use crate::library::logger::interface::Logger;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Runs effects off the coordination thread and reports each outcome back as a [`Msg`].
#[derive(Clone)]
pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    image_source: Arc<dyn ImageSource + Send + Sync>,
    image_classifier: Option<Arc<dyn ImageClassifier + Send + Sync>>,
    input_shape: (u32, u32),
    msg_sender: Sender<Msg>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        image_source: Arc<dyn ImageSource + Send + Sync>,
        image_classifier: Option<Arc<dyn ImageClassifier + Send + Sync>>,
        input_shape: (u32, u32),
        msg_sender: Sender<Msg>,
    ) -> Self {
        Self {
            logger: logger.with_namespace("worker"),
            image_source,
            image_classifier,
            input_shape,
            msg_sender,
        }
    }

    pub fn spawn(&self, effect: Effect) {
        let self_clone = self.clone();
        std::thread::spawn(move || self_clone.run_effect(effect));
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::CaptureImage => {
                let captured = self.image_source.capture();
                if let Err(e) = &captured {
                    let _ = self.logger.error(&format!("Capture failed: {}", e));
                }
                let _ = self.msg_sender.send(Msg::CaptureDone(captured));
            }
            Effect::ClassifyImage { generation, image } => {
                let result = self.classify(&image);
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Prediction failed: {}", e));
                }
                let _ = self.msg_sender.send(Msg::ClassifyDone { generation, result });
            }
        }
    }

    // A panicking model still has to produce a completion, or the pipeline would stay
    // loading forever.
    fn classify(
        &self,
        image: &CapturedImage,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let image_classifier = self
            .image_classifier
            .as_ref()
            .ok_or("classifier is not loaded")?;

        let prepared = prepare(image, self.input_shape)?;

        panic::catch_unwind(AssertUnwindSafe(|| image_classifier.classify(&prepared)))
            .unwrap_or_else(|payload| Err(panic_message(payload.as_ref()).into()))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("classifier panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("classifier panicked: {}", message)
    } else {
        "classifier panicked".to_string()
    }
}
