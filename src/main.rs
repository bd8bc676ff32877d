use clap::Parser;
use config::Config;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use image_source::impl_fake::ImageSourceFake;
use image_source::impl_file::{load_captured_image, ImageSourceFile};
use image_source::interface::ImageSource;
use inference_pipeline::main::InferencePipeline;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use presenter::impl_console::PresenterConsole;
use presenter::impl_gui::PresenterGui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

mod config;
mod image_classifier;
mod image_source;
mod inference_pipeline;
mod library;
mod presenter;

const FAKE_CAMERA_CAPTURES: usize = 3;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Normal/Abnormal screening of chest X-rays", long_about = None)]
struct Args {
    /// Path to the ONNX model (default: ./models/chest_xray_classifier.onnx)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Side length in pixels of the square model input
    #[arg(long, default_value_t = 224)]
    input_size: u32,

    /// Class names in model output order, comma-separated (e.g. "Abnormal,Normal")
    #[arg(long, value_delimiter = ',')]
    labels: Vec<String>,

    /// The model already outputs probabilities, so no softmax or sigmoid is applied
    #[arg(long, default_value_t = false)]
    no_softmax: bool,

    /// Classify with random scores instead of loading a model
    #[arg(long, default_value_t = false)]
    fake_classifier: bool,

    /// Open a window instead of printing to the terminal
    #[arg(long, default_value_t = false)]
    gui: bool,

    /// Images to classify, in order. A simulated camera is used when none are given.
    images: Vec<PathBuf>,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::default();

        if let Some(model) = &self.model {
            config.model.onnx_model_path = model.display().to_string();
        }
        config.model.input_shape = (self.input_size, self.input_size);
        if !self.labels.is_empty() {
            config.model.labels = self.labels.iter().map(|l| l.trim().to_string()).collect();
        }
        config.model.apply_softmax = !self.no_softmax;

        config
    }
}

fn main() -> Result<(), BoxError> {
    let args = Args::parse();
    let config = args.config();

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let image_classifier = load_image_classifier(&args, &config, logger.clone());

    let image_source: Arc<dyn ImageSource + Send + Sync> = if args.images.is_empty() {
        Arc::new(ImageSourceFake::new(logger.clone(), config.fake_device_latency))
    } else {
        Arc::new(ImageSourceFile::new(logger.clone(), args.images.clone()))
    };

    if args.gui {
        run_gui(&config, logger, image_source, image_classifier)
    } else {
        run_console(&config, logger, image_source, image_classifier, &args.images)
    }
}

/// Loaded once. A failure is handed to the pipeline, which reports it instead of exiting.
fn load_image_classifier(
    args: &Args,
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Arc<dyn ImageClassifier + Send + Sync>, BoxError> {
    if args.fake_classifier {
        return Ok(Arc::new(ImageClassifierFake::new(
            logger,
            config.fake_device_latency,
        )));
    }

    let image_classifier = ImageClassifierTractOnnx::new(config.model.clone(), logger)?;
    Ok(Arc::new(image_classifier))
}

/// Classifies each of `images` in turn, or takes a few shots with the simulated camera when
/// none are given. Every round starts from a cleared screen and waits for its result.
fn run_console(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
    image_source: Arc<dyn ImageSource + Send + Sync>,
    image_classifier: Result<Arc<dyn ImageClassifier + Send + Sync>, BoxError>,
    images: &[PathBuf],
) -> Result<(), BoxError> {
    let presenter = Arc::new(Mutex::new(PresenterConsole::new()));

    let mut pipeline = InferencePipeline::new(
        config,
        logger.clone(),
        image_source,
        image_classifier,
        presenter,
    );

    if images.is_empty() {
        for _ in 0..FAKE_CAMERA_CAPTURES {
            pipeline.clear();
            pipeline.request_capture();
            pipeline.settle();
        }
        return Ok(());
    }

    for path in images {
        let image = match load_captured_image(path) {
            Ok(image) => Some(image),
            Err(e) => {
                let _ = logger.error(&format!("Could not read {}: {}", path.display(), e));
                None
            }
        };

        pipeline.clear();
        pipeline.classify(image);
        pipeline.settle();
    }

    Ok(())
}

fn run_gui(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
    image_source: Arc<dyn ImageSource + Send + Sync>,
    image_classifier: Result<Arc<dyn ImageClassifier + Send + Sync>, BoxError>,
) -> Result<(), BoxError> {
    let presenter = PresenterGui::new();

    let mut pipeline = InferencePipeline::new(
        config,
        logger,
        image_source,
        image_classifier,
        Arc::new(Mutex::new(presenter.clone())),
    );
    let handle = pipeline.handle();

    std::thread::spawn(move || pipeline.run());

    // The window owns the main thread until it is closed.
    presenter.run_window(handle)
}
