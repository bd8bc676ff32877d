use crate::image_source::captured_image::CapturedImage;

#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Image(CapturedImage),
    Cancelled,
}

pub trait ImageSource {
    /// Blocks until the user has taken a photo or backed out.
    fn capture(&self) -> Result<Capture, Box<dyn std::error::Error + Send + Sync>>;
}
