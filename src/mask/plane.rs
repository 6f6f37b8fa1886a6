use crate::buffer::{resize_plane, Resample};
use crate::error::{Error, Result};
use image::GrayImage;
use ndarray::ArrayViewD;

/// Dense row-major plane of model outputs in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScalarPlane {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
}

impl ScalarPlane {
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidMaskShape(format!(
                "mask is {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(Error::InvalidMaskShape(format!(
                "{width}x{height} mask needs {expected} values, got {}",
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Accepts `[H, W]`, `[1, H, W]` or `[1, 1, H, W]` shaped tensors.
    pub fn from_tensor(tensor: ArrayViewD<'_, f32>) -> Result<Self> {
        let shape = tensor.shape();
        if shape.len() < 2 || shape[..shape.len() - 2].iter().any(|&d| d != 1) {
            return Err(Error::InvalidMaskShape(format!(
                "expected [.., 1, H, W] tensor, got {shape:?}"
            )));
        }

        let height = u32::try_from(shape[shape.len() - 2])
            .map_err(|_| Error::InvalidMaskShape(format!("tensor too tall: {shape:?}")))?;
        let width = u32::try_from(shape[shape.len() - 1])
            .map_err(|_| Error::InvalidMaskShape(format!("tensor too wide: {shape:?}")))?;

        Self::new(width, height, tensor.iter().copied().collect())
    }

    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(Error::InvalidMaskShape("ragged rows".to_string()));
        }
        let width = u32::try_from(width)
            .map_err(|_| Error::InvalidMaskShape("too many columns".to_string()))?;
        let height = u32::try_from(height)
            .map_err(|_| Error::InvalidMaskShape("too many rows".to_string()))?;

        Self::new(width, height, rows.concat())
    }

    pub fn from_gray(image: &GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        let values = image.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
        Self::new(width, height, values)
    }

    /// Map every value through `to_opacity`, then fit to the target size.
    pub fn resolve(
        &self,
        target: (u32, u32),
        resample: Resample,
        to_opacity: impl Fn(f32) -> u8,
    ) -> Result<Vec<u8>> {
        let quantized: Vec<u8> = self.values.iter().map(|&v| to_opacity(v)).collect();
        let plane = GrayImage::from_raw(self.width, self.height, quantized)
            .ok_or_else(|| Error::InvalidMaskShape("mask length mismatch".to_string()))?;

        Ok(resize_plane(&plane, target.0, target.1, resample).into_raw())
    }
}

/// `round(v * 255)` with v clamped to [0, 1]. NaN maps to 0.
pub(crate) fn unit_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    #[test]
    fn unit_to_u8_rounds_and_clamps() {
        assert_eq!(unit_to_u8(0.0), 0);
        assert_eq!(unit_to_u8(1.0), 255);
        assert_eq!(unit_to_u8(0.5), 128);
        assert_eq!(unit_to_u8(-3.0), 0);
        assert_eq!(unit_to_u8(7.0), 255);
        assert_eq!(unit_to_u8(f32::NAN), 0);
    }

    #[test]
    fn tensor_shapes() {
        let four = Array::from_shape_vec(IxDyn(&[1, 1, 2, 3]), vec![0.0; 6]).unwrap();
        let plane = ScalarPlane::from_tensor(four.view()).unwrap();
        assert_eq!((plane.width, plane.height), (3, 2));

        let two = Array::from_shape_vec(IxDyn(&[2, 3]), vec![0.0; 6]).unwrap();
        assert!(ScalarPlane::from_tensor(two.view()).is_ok());

        let batch = Array::from_shape_vec(IxDyn(&[2, 1, 1, 3]), vec![0.0; 6]).unwrap();
        assert!(matches!(
            ScalarPlane::from_tensor(batch.view()),
            Err(Error::InvalidMaskShape(_))
        ));

        let empty = Array::from_shape_vec(IxDyn(&[1, 1, 0, 4]), vec![]).unwrap();
        assert!(ScalarPlane::from_tensor(empty.view()).is_err());

        let flat = Array::from_shape_vec(IxDyn(&[6]), vec![0.0; 6]).unwrap();
        assert!(ScalarPlane::from_tensor(flat.view()).is_err());
    }

    #[test]
    fn rows_must_be_rectangular() {
        assert!(ScalarPlane::from_rows(&[vec![0.0, 1.0], vec![1.0]]).is_err());
        assert!(ScalarPlane::from_rows(&[]).is_err());

        let plane = ScalarPlane::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(plane.values, vec![0.0, 1.0, 1.0, 0.0]);
    }
}
