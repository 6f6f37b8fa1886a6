use crate::buffer::PixelBuffer;
use image::buffer::ConvertBuffer;
use image::{imageops, RgbImage};
use ndarray::Array4;

/// Preprocessor for converting images to model input tensors
pub struct Preprocessor {
    target_width: u32,
    target_height: u32,
    mean: f32,
    std: f32,
}

impl Preprocessor {
    /// Plain `[0, 1]` scaling.
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            mean: 0.0,
            std: 1.0,
        }
    }

    /// Apply `(x - mean) / std` after scaling to `[0, 1]`.
    pub fn normalized(mut self, mean: f32, std: f32) -> Self {
        self.mean = mean;
        self.std = std;
        self
    }

    pub fn target_size(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    /// Preprocess an image into a normalized NCHW tensor
    ///
    /// Steps:
    /// 1. Drop alpha and resize to target dimensions
    /// 2. Convert to float, scale to [0, 1], then normalize
    /// 3. Transpose from HWC to NCHW format
    ///
    /// Returns: Array4<f32> with shape [1, 3, height, width]
    pub fn preprocess(&self, image: &PixelBuffer) -> Array4<f32> {
        let _span = tracing::debug_span!("preprocess").entered();

        let rgb: RgbImage = image.as_image().convert();
        let resized = if rgb.dimensions() != (self.target_width, self.target_height) {
            imageops::resize(
                &rgb,
                self.target_width,
                self.target_height,
                imageops::FilterType::Lanczos3,
            )
        } else {
            rgb
        };

        let (width, height) = resized.dimensions();
        let mut tensor = Array4::<f32>::zeros((1, 3, height as usize, width as usize));

        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                let value = pixel[c] as f32 / 255.0;
                tensor[[0, c, y as usize, x as usize]] = (value - self.mean) / self.std;
            }
        }

        tensor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_nchw_at_target_size() {
        let image = PixelBuffer::filled(10, 4, [255, 0, 51, 255]).unwrap();
        let tensor = Preprocessor::new(8, 6).preprocess(&image);
        assert_eq!(tensor.shape(), &[1, 3, 6, 8]);
    }

    #[test]
    fn scales_to_unit_range() {
        let image = PixelBuffer::filled(2, 2, [255, 0, 51, 255]).unwrap();
        let tensor = Preprocessor::new(2, 2).preprocess(&image);
        assert_eq!(tensor[[0, 0, 1, 1]], 1.0);
        assert_eq!(tensor[[0, 1, 0, 0]], 0.0);
        assert!((tensor[[0, 2, 0, 1]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn alpha_is_dropped_without_premultiplying() {
        let image = PixelBuffer::filled(3, 2, [255, 102, 0, 0]).unwrap();
        let tensor = Preprocessor::new(3, 2).preprocess(&image);
        assert_eq!(tensor[[0, 0, 1, 2]], 1.0);
        assert!((tensor[[0, 1, 0, 0]] - 0.4).abs() < 1e-6);
        assert_eq!(tensor[[0, 2, 1, 1]], 0.0);
    }

    #[test]
    fn symmetric_normalization() {
        let image = PixelBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap();
        let tensor = Preprocessor::new(2, 2).normalized(0.5, 0.5).preprocess(&image);
        assert_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_eq!(tensor[[0, 1, 0, 0]], -1.0);
    }
}
