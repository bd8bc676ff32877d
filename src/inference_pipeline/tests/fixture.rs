use crate::config::Config;
use crate::image_classifier::impl_scripted::{ImageClassifierScripted, ScriptedOutcome};
use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::image_source::captured_image::CapturedImage;
use crate::image_source::impl_fake::ImageSourceFake;
use crate::inference_pipeline::main::InferencePipeline;
use crate::library::logger::impl_fake::LoggerFake;
use crate::presenter::impl_fake::PresenterFake;
use image::DynamicImage;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub struct Fixture {
    pub logger: LoggerFake,
    pub image_classifier: Arc<ImageClassifierScripted>,
    pub presenter: PresenterFake,
    pub pipeline: InferencePipeline,
}

impl Fixture {
    pub fn new(outcomes: Vec<(Duration, ScriptedOutcome)>) -> Self {
        Self::build(outcomes, 0.0, true)
    }

    pub fn returning(classifications: Vec<Classification>) -> Self {
        Self::new(vec![(
            Duration::ZERO,
            ScriptedOutcome::Classifications(classifications),
        )])
    }

    pub fn without_model() -> Self {
        Self::build(vec![], 0.0, false)
    }

    pub fn with_cancelling_camera(outcomes: Vec<(Duration, ScriptedOutcome)>) -> Self {
        Self::build(outcomes, 1.0, true)
    }

    fn build(
        outcomes: Vec<(Duration, ScriptedOutcome)>,
        cancel_probability: f64,
        model_loaded: bool,
    ) -> Self {
        let config = Config {
            fake_device_latency: Duration::ZERO,
            ..Config::default()
        };
        let logger = LoggerFake::new();
        let shared_logger = Arc::new(logger.clone());

        let image_classifier = Arc::new(ImageClassifierScripted::new(
            shared_logger.clone(),
            outcomes,
        ));
        let image_source = Arc::new(
            ImageSourceFake::new(shared_logger.clone(), config.fake_device_latency)
                .with_cancel_probability(cancel_probability),
        );
        let presenter = PresenterFake::new(shared_logger.clone());

        let loaded: Result<
            Arc<dyn ImageClassifier + Send + Sync>,
            Box<dyn std::error::Error + Send + Sync>,
        > = if model_loaded {
            Ok(image_classifier.clone())
        } else {
            Err("model file missing".into())
        };

        let pipeline = InferencePipeline::new(
            &config,
            shared_logger,
            image_source,
            loaded,
            Arc::new(Mutex::new(presenter.clone())),
        );

        Self {
            logger,
            image_classifier,
            presenter,
            pipeline,
        }
    }
}

pub fn xray() -> CapturedImage {
    CapturedImage::from(DynamicImage::new_luma8(320, 240))
}

pub fn wait_until(condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "Timed out waiting for condition");
        std::thread::sleep(Duration::from_millis(5));
    }
}
