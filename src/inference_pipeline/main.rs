use crate::config::Config;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_source::captured_image::CapturedImage;
use crate::image_source::interface::ImageSource;
use crate::inference_pipeline::core::{init, transition, Effect, Model, Msg};
use crate::inference_pipeline::render::{view, Render};
use crate::inference_pipeline::run_effect::RunEffect;
use crate::library::logger::interface::Logger;
use crate::presenter::interface::{PresentedView, Presenter};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::time::Duration;

/// Sends commands to a pipeline from other threads, e.g. a window's button handlers. The
/// commands are applied in order on the pipeline's own thread.
#[derive(Clone)]
pub struct PipelineHandle {
    msg_sender: Sender<Msg>,
}

impl PipelineHandle {
    pub fn classify(&self, image: Option<CapturedImage>) {
        let _ = self.msg_sender.send(Msg::ClassifyRequested(image));
    }

    pub fn clear(&self) {
        let _ = self.msg_sender.send(Msg::ClearRequested);
    }

    pub fn request_capture(&self) {
        let _ = self.msg_sender.send(Msg::CaptureRequested);
    }
}

/// Owns the published classification state. Whichever thread holds the pipeline is the
/// coordination thread: every state change happens there, while capture and inference run
/// on spawned worker threads.
pub struct InferencePipeline {
    model: Model,
    logger: Arc<dyn Logger + Send + Sync>,
    run_effect: RunEffect,
    render: Render,
    msg_sender: Sender<Msg>,
    msg_receiver: Receiver<Msg>,
    in_flight: usize,
}

impl InferencePipeline {
    /// `image_classifier` is the outcome of the one and only model load.
    pub fn new(
        config: &Config,
        logger: Arc<dyn Logger + Send + Sync>,
        image_source: Arc<dyn ImageSource + Send + Sync>,
        image_classifier: Result<
            Arc<dyn ImageClassifier + Send + Sync>,
            Box<dyn std::error::Error + Send + Sync>,
        >,
        presenter: Arc<Mutex<dyn Presenter + Send + Sync>>,
    ) -> Self {
        let logger = logger.with_namespace("pipeline");

        let image_classifier = match image_classifier {
            Ok(image_classifier) => Some(image_classifier),
            Err(e) => {
                let _ = logger.error(&format!("Model load error: {}", e));
                None
            }
        };

        let (msg_sender, msg_receiver) = channel();
        let (model, effects) = init(image_classifier.is_some());

        let run_effect = RunEffect::new(
            logger.clone(),
            image_source,
            image_classifier,
            config.model.input_shape,
            msg_sender.clone(),
        );

        let mut pipeline = Self {
            model,
            logger,
            run_effect,
            render: Render::new(presenter),
            msg_sender,
            msg_receiver,
            in_flight: 0,
        };

        pipeline.publish();
        pipeline.spawn_effects(effects);
        pipeline
    }

    #[cfg(test)]
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn view(&self) -> PresentedView {
        view(&self.model)
    }

    pub fn handle(&self) -> PipelineHandle {
        PipelineHandle {
            msg_sender: self.msg_sender.clone(),
        }
    }

    /// Starts classifying `image` and returns straight away. The state is `Loading` by the
    /// time this returns; the outcome arrives through [`Self::process_next`].
    pub fn classify(&mut self, image: Option<CapturedImage>) {
        self.update(Msg::ClassifyRequested(image));
    }

    /// Back to "No prediction yet". A classification still running is left alone, but its
    /// result will be dropped.
    pub fn clear(&mut self) {
        self.update(Msg::ClearRequested);
    }

    pub fn request_capture(&mut self) {
        self.update(Msg::CaptureRequested);
    }

    /// True while a capture or classification spawned by this pipeline has not reported
    /// back yet.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Blocks for the next message and applies it. Returns `false` if the channel closed.
    pub fn process_next(&mut self) -> bool {
        match self.msg_receiver.recv() {
            Ok(msg) => {
                self.update(msg);
                true
            }
            Err(_) => false,
        }
    }

    /// Like [`Self::process_next`] but gives up after `timeout`.
    #[cfg(test)]
    pub fn process_next_timeout(&mut self, timeout: Duration) -> bool {
        match self.msg_receiver.recv_timeout(timeout) {
            Ok(msg) => {
                self.update(msg);
                true
            }
            Err(_) => false,
        }
    }

    /// Applies whatever is already queued without blocking.
    #[cfg(test)]
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.msg_receiver.try_recv() {
            self.update(msg);
            processed += 1;
        }
        processed
    }

    /// Processes messages until every spawned capture and classification has reported back.
    pub fn settle(&mut self) {
        while self.is_busy() {
            if !self.process_next() {
                return;
            }
        }
    }

    /// Runs the coordination loop for as long as the process lives.
    pub fn run(&mut self) {
        while self.process_next() {}
    }

    fn update(&mut self, msg: Msg) {
        let _ = self.logger.info(&format!("Processing msg: {:?}", msg));

        if matches!(msg, Msg::CaptureDone(_) | Msg::ClassifyDone { .. }) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        if let Msg::ClassifyDone { generation, .. } = &msg {
            if *generation != self.model.generation {
                let _ = self.logger.info(&format!(
                    "Dropping stale result for request {} (current {})",
                    generation, self.model.generation
                ));
            }
        }

        let model = self.model.clone();
        let (new_model, effects) = transition(model, msg);

        let changed = new_model != self.model;
        self.model = new_model;

        if changed {
            let _ = self
                .logger
                .info(&format!("New state: {:?}", self.model.state));
            self.publish();
        }

        self.spawn_effects(effects);
    }

    fn publish(&self) {
        if let Err(e) = self.render.render(&self.model) {
            let _ = self.logger.error(&format!("Render failed: {}", e));
        }
    }

    fn spawn_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.in_flight += 1;
            self.run_effect.spawn(effect);
        }
    }
}
