use crate::buffer::Resample;
use crate::error::{Error, Result};

pub const DEFAULT_BRUSH_RADIUS: u32 = 20;
pub const DEFAULT_MODEL_INPUT: u32 = 512;

/// Knobs for an [`crate::EditorSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Brush radius in buffer pixels
    pub brush_radius: u32,
    /// Filter used to fit model output to the image
    pub resample: Resample,
    /// Square input edge fed to the matting model
    pub model_input_size: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            brush_radius: DEFAULT_BRUSH_RADIUS,
            resample: Resample::Bilinear,
            model_input_size: DEFAULT_MODEL_INPUT,
        }
    }
}

impl EditorConfig {
    pub fn brush_radius(mut self, radius: u32) -> Self {
        self.brush_radius = radius;
        self
    }

    pub fn resample(mut self, resample: Resample) -> Self {
        self.resample = resample;
        self
    }

    pub fn model_input_size(mut self, size: u32) -> Self {
        self.model_input_size = size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.brush_radius == 0 {
            return Err(Error::InvalidBrushRadius);
        }
        if self.model_input_size == 0 {
            return Err(Error::InvalidDimensions {
                width: self.model_input_size,
                height: self.model_input_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resample, Resample::Bilinear);
    }

    #[test]
    fn setters_chain() {
        let config = EditorConfig::default()
            .brush_radius(4)
            .resample(Resample::Nearest)
            .model_input_size(256);
        assert_eq!(config.brush_radius, 4);
        assert_eq!(config.resample, Resample::Nearest);
        assert_eq!(config.model_input_size, 256);
    }

    #[test]
    fn zero_values_fail_validation() {
        assert!(EditorConfig::default().brush_radius(0).validate().is_err());
        assert!(EditorConfig::default().model_input_size(0).validate().is_err());
    }
}
