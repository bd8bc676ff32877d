use crate::image_source::captured_image::CapturedImage;
use std::error::Error;

/// Everything a screen needs to draw the current classification.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PresentedView {
    pub preview_image: Option<CapturedImage>,
    pub is_loading: bool,
    pub result_text: String,
    pub confidence_value: f32,
}

pub trait Presenter: Send + Sync {
    /// Called on the coordination thread after every state change.
    fn render(&mut self, view: &PresentedView) -> Result<(), Box<dyn Error + Send + Sync>>;
}
