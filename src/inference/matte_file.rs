use super::types::{InferenceOutput, MattingModel, OutputKind};
use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::mask::{ModelMatte, SegmentationMask};
use image::GrayImage;
use std::path::Path;

/// Stands in for a model by replaying a precomputed grayscale matte or mask.
///
/// Useful when the network ran elsewhere (another process, a browser) and only its
/// output image is available.
pub struct MatteImage {
    plane: GrayImage,
    kind: OutputKind,
}

impl MatteImage {
    pub fn new(plane: GrayImage, kind: OutputKind) -> Self {
        Self { plane, kind }
    }

    pub fn open<P: AsRef<Path>>(path: P, kind: OutputKind) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading {:?} image from {}", kind, path.display());

        let image = image::open(path)
            .map_err(|e| Error::InferenceUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Self::new(image.to_luma8(), kind))
    }
}

impl MattingModel for MatteImage {
    fn infer(&mut self, _image: &PixelBuffer) -> Result<InferenceOutput> {
        let output = match self.kind {
            OutputKind::Matte => InferenceOutput::Matte(ModelMatte::from_gray(&self.plane)?),
            OutputKind::Segmentation => {
                InferenceOutput::Segmentation(SegmentationMask::from_gray(&self.plane)?)
            }
        };
        Ok(output)
    }

    fn input_size(&self) -> (u32, u32) {
        self.plane.dimensions()
    }
}
