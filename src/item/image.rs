use serde::{Deserialize, Serialize};

/// An uploaded raster image placed on the canvas.
///
/// The source bytes are fixed at upload time; edits only touch the frame
/// and `opacity`. Intrinsic dimensions are kept so resize can preserve
/// the original aspect ratio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Encoded source bytes as handed over by the upload collaborator
    /// (PNG, JPEG, ...). Decoded lazily for display and export.
    pub bytes: Vec<u8>,
    pub original_width: u32,
    pub original_height: u32,
    /// 0.0 (transparent) ..= 1.0 (opaque).
    pub opacity: f32,
}

impl ImageItem {
    pub fn new(bytes: Vec<u8>, original_width: u32, original_height: u32) -> Self {
        Self {
            bytes,
            original_width,
            original_height,
            opacity: 1.0,
        }
    }
}
