use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::mask::{MaskSource, ModelMatte, SegmentationMask};

/// Which convention a model's raw values follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// 1.0 = foreground
    Matte,
    /// 1.0 = masked-out class
    Segmentation,
}

/// Raw result handed back by an inference collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutput {
    Matte(ModelMatte),
    Segmentation(SegmentationMask),
}

impl InferenceOutput {
    pub fn kind(&self) -> OutputKind {
        match self {
            InferenceOutput::Matte(_) => OutputKind::Matte,
            InferenceOutput::Segmentation(_) => OutputKind::Segmentation,
        }
    }
}

impl From<InferenceOutput> for MaskSource {
    fn from(output: InferenceOutput) -> Self {
        match output {
            InferenceOutput::Matte(matte) => MaskSource::ModelMatte(matte),
            InferenceOutput::Segmentation(mask) => MaskSource::Segmentation(mask),
        }
    }
}

/// Trait for matting / segmentation models
/// Allows swapping between different backends (MODNet, precomputed mattes, test doubles)
pub trait MattingModel {
    /// Run the model on a decoded image
    ///
    /// The output may be at the model's own resolution; it is fitted to the image
    /// when composited.
    fn infer(&mut self, image: &PixelBuffer) -> Result<InferenceOutput>;

    /// Get the model's preferred input dimensions
    ///
    /// Returns (width, height)
    fn input_size(&self) -> (u32, u32);
}
