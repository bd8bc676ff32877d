use crate::inference_pipeline::core::{ClassificationState, Model};
use crate::presenter::interface::{PresentedView, Presenter};
use std::sync::{Arc, Mutex};

pub const NO_PREDICTION_TEXT: &str = "No prediction yet";
pub const ANALYZING_TEXT: &str = "Analyzing…";

pub fn result_text(state: &ClassificationState) -> String {
    match state {
        ClassificationState::Idle => NO_PREDICTION_TEXT.to_string(),
        ClassificationState::Loading => ANALYZING_TEXT.to_string(),
        ClassificationState::Succeeded { display_text, .. } => display_text.clone(),
        ClassificationState::Failed(failure) => capitalize(&failure.to_string()),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn view(model: &Model) -> PresentedView {
    PresentedView {
        preview_image: model.preview_image.clone(),
        is_loading: model.state.is_loading(),
        result_text: result_text(&model.state),
        confidence_value: model.state.confidence(),
    }
}

#[derive(Clone)]
pub struct Render {
    presenter: Arc<Mutex<dyn Presenter + Send + Sync>>,
}

impl Render {
    pub fn new(presenter: Arc<Mutex<dyn Presenter + Send + Sync>>) -> Self {
        Self { presenter }
    }

    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut presenter = self.presenter.lock().map_err(|e| e.to_string())?;
        presenter.render(&view(model))
    }
}
