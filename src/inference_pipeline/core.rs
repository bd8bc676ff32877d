use crate::image_classifier::interface::Classification;
use crate::image_source::captured_image::CapturedImage;
use crate::image_source::interface::Capture;
use crate::inference_pipeline::label::display_text;
use thiserror::Error;

/// Why a classification attempt ended without a result. None of these are fatal; each is
/// shown to the user, who can capture again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("model load error")]
    ModelLoad,
    #[error("model not ready")]
    ModelNotReady,
    #[error("no image selected")]
    NoImage,
    #[error("no result")]
    EmptyResult,
    #[error("prediction failed")]
    Inference,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClassificationState {
    #[default]
    Idle,
    Loading,
    Succeeded {
        display_text: String,
        confidence: f32,
    },
    Failed(Failure),
}

impl ClassificationState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ClassificationState::Loading)
    }

    pub fn confidence(&self) -> f32 {
        match self {
            ClassificationState::Succeeded { confidence, .. } => *confidence,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub state: ClassificationState,
    pub preview_image: Option<CapturedImage>,
    /// Bumped by every classify and clear. Classifier results tagged with an older value
    /// are discarded.
    pub generation: u64,
    pub classifier_ready: bool,
}

#[derive(Debug)]
pub enum Msg {
    ClassifyRequested(Option<CapturedImage>),
    ClearRequested,
    CaptureRequested,
    CaptureDone(Result<Capture, Box<dyn std::error::Error + Send + Sync>>),
    ClassifyDone {
        generation: u64,
        result: Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CaptureImage,
    ClassifyImage {
        generation: u64,
        image: CapturedImage,
    },
}

pub fn init(classifier_ready: bool) -> (Model, Vec<Effect>) {
    let state = if classifier_ready {
        ClassificationState::Idle
    } else {
        ClassificationState::Failed(Failure::ModelLoad)
    };

    (
        Model {
            state,
            preview_image: None,
            generation: 0,
            classifier_ready,
        },
        vec![],
    )
}

pub fn transition(model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match (model.state.clone(), msg) {
        // Commands
        (_, Msg::ClassifyRequested(image)) => classify(model, image),
        (_, Msg::ClearRequested) => (
            Model {
                state: ClassificationState::Idle,
                preview_image: None,
                generation: model.generation.wrapping_add(1),
                ..model
            },
            vec![],
        ),
        (_, Msg::CaptureRequested) => (model, vec![Effect::CaptureImage]),

        // Capture outcome
        (_, Msg::CaptureDone(Ok(Capture::Image(image)))) => classify(model, Some(image)),
        (_, Msg::CaptureDone(Ok(Capture::Cancelled))) | (_, Msg::CaptureDone(Err(_))) => {
            classify(model, None)
        }

        // Classifier outcome
        (ClassificationState::Loading, Msg::ClassifyDone { generation, result })
            if generation == model.generation =>
        {
            let state = match result {
                Err(_) => ClassificationState::Failed(Failure::Inference),
                Ok(classifications) => match classifications.first() {
                    None => ClassificationState::Failed(Failure::EmptyResult),
                    Some(top) => ClassificationState::Succeeded {
                        display_text: display_text(&top.label, top.confidence),
                        confidence: top.confidence,
                    },
                },
            };
            (Model { state, ..model }, vec![])
        }

        // Stale result from a superseded or cleared request
        (_, Msg::ClassifyDone { .. }) => (model, vec![]),
    }
}

fn classify(model: Model, image: Option<CapturedImage>) -> (Model, Vec<Effect>) {
    let generation = model.generation.wrapping_add(1);
    let preview_image = image.clone().or(model.preview_image);

    match image {
        _ if !model.classifier_ready => (
            Model {
                state: ClassificationState::Failed(Failure::ModelNotReady),
                preview_image,
                generation,
                ..model
            },
            vec![],
        ),
        None => (
            Model {
                state: ClassificationState::Failed(Failure::NoImage),
                preview_image,
                generation,
                ..model
            },
            vec![],
        ),
        Some(image) => (
            Model {
                state: ClassificationState::Loading,
                preview_image,
                generation,
                ..model
            },
            vec![Effect::ClassifyImage { generation, image }],
        ),
    }
}
