//! Mask producers and their common opacity contract.
//!
//! Every producer resolves to an [`OpacityMask`] of the target size, so compositing
//! never needs to know which one it was handed.

mod plane;

use crate::buffer::{PixelBuffer, Resample};
use crate::error::{Error, Result};
use crate::paint::PaintedMask;
use image::GrayImage;
use ndarray::ArrayViewD;
use plane::{unit_to_u8, ScalarPlane};

/// Per-pixel opacity, 255 = keep, 0 = remove. Row-major, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpacityMask {
    width: u32,
    height: u32,
    values: Vec<u8>,
}

impl OpacityMask {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Opaque grayscale rendering of the mask, white = kept.
    pub fn to_preview(&self) -> Result<PixelBuffer> {
        let data = self.values.iter().flat_map(|&v| [v, v, v, 255]).collect();
        PixelBuffer::from_raw(self.width, self.height, data)
    }
}

/// Alpha matte from a matting model: 1.0 = foreground, 0.0 = background.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMatte(ScalarPlane);

impl ModelMatte {
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Result<Self> {
        ScalarPlane::new(width, height, values).map(Self)
    }

    pub fn from_tensor(tensor: ArrayViewD<'_, f32>) -> Result<Self> {
        ScalarPlane::from_tensor(tensor).map(Self)
    }

    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        ScalarPlane::from_rows(rows).map(Self)
    }

    pub fn from_gray(image: &GrayImage) -> Result<Self> {
        ScalarPlane::from_gray(image).map(Self)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.0.width, self.0.height)
    }
}

/// Segmentation output where 1.0 marks a masked-out class.
///
/// The opacity is inverted relative to [`ModelMatte`]: `round((1 - v) * 255)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationMask(ScalarPlane);

impl SegmentationMask {
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Result<Self> {
        ScalarPlane::new(width, height, values).map(Self)
    }

    pub fn from_tensor(tensor: ArrayViewD<'_, f32>) -> Result<Self> {
        ScalarPlane::from_tensor(tensor).map(Self)
    }

    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        ScalarPlane::from_rows(rows).map(Self)
    }

    pub fn from_gray(image: &GrayImage) -> Result<Self> {
        ScalarPlane::from_gray(image).map(Self)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.0.width, self.0.height)
    }
}

/// Anything that can decide, per pixel, how much of the source survives.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskSource {
    ModelMatte(ModelMatte),
    Painted(PaintedMask),
    Segmentation(SegmentationMask),
}

impl MaskSource {
    pub fn kind(&self) -> &'static str {
        match self {
            MaskSource::ModelMatte(_) => "model_matte",
            MaskSource::Painted(_) => "painted",
            MaskSource::Segmentation(_) => "segmentation",
        }
    }

    /// Resolve to opacity values at exactly `width x height`.
    ///
    /// Model outputs are resampled to fit; a painted mask must already match.
    pub fn resolve(&self, width: u32, height: u32, resample: Resample) -> Result<OpacityMask> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidMaskShape(format!(
                "target is {width}x{height}"
            )));
        }

        let values = match self {
            MaskSource::ModelMatte(ModelMatte(plane)) => {
                plane.resolve((width, height), resample, unit_to_u8)?
            }
            MaskSource::Segmentation(SegmentationMask(plane)) => {
                plane.resolve((width, height), resample, |v| unit_to_u8(1.0 - v))?
            }
            MaskSource::Painted(mask) => {
                if mask.dimensions() != (width, height) {
                    let (mw, mh) = mask.dimensions();
                    return Err(Error::InvalidMaskShape(format!(
                        "painted mask is {mw}x{mh}, image is {width}x{height}"
                    )));
                }
                mask.as_raw().to_vec()
            }
        };

        Ok(OpacityMask {
            width,
            height,
            values,
        })
    }
}

impl From<ModelMatte> for MaskSource {
    fn from(matte: ModelMatte) -> Self {
        MaskSource::ModelMatte(matte)
    }
}

impl From<PaintedMask> for MaskSource {
    fn from(mask: PaintedMask) -> Self {
        MaskSource::Painted(mask)
    }
}

impl From<SegmentationMask> for MaskSource {
    fn from(mask: SegmentationMask) -> Self {
        MaskSource::Segmentation(mask)
    }
}
