use image::metadata::Orientation;
use image::DynamicImage;
use std::fmt;
use std::sync::Arc;

/// A photo handed over by an image source, with the EXIF orientation of its stored pixels.
/// The bitmap is shared, so clones are cheap and the pixels never change after capture.
#[derive(Clone)]
pub struct CapturedImage {
    bitmap: Arc<DynamicImage>,
    orientation: Orientation,
}

impl CapturedImage {
    pub fn new(bitmap: DynamicImage, orientation: Orientation) -> Self {
        Self {
            bitmap: Arc::new(bitmap),
            orientation,
        }
    }

    pub fn bitmap(&self) -> &DynamicImage {
        &self.bitmap
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Rotated and flipped so that it reads upright.
    pub fn upright(&self) -> DynamicImage {
        let mut image = (*self.bitmap).clone();
        image.apply_orientation(self.orientation);
        image
    }

    /// True when both handles point at the same capture, without comparing pixels.
    pub fn same_capture(&self, other: &CapturedImage) -> bool {
        Arc::ptr_eq(&self.bitmap, &other.bitmap) && self.orientation == other.orientation
    }
}

impl From<DynamicImage> for CapturedImage {
    fn from(bitmap: DynamicImage) -> Self {
        Self::new(bitmap, Orientation::NoTransforms)
    }
}

impl PartialEq for CapturedImage {
    fn eq(&self, other: &Self) -> bool {
        self.orientation == other.orientation
            && (Arc::ptr_eq(&self.bitmap, &other.bitmap) || self.bitmap == other.bitmap)
    }
}

// Printing the pixels would flood the logs.
impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("width", &self.bitmap.width())
            .field("height", &self.bitmap.height())
            .field("orientation", &self.orientation)
            .finish()
    }
}
