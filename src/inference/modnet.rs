use super::preprocess::Preprocessor;
use super::types::{InferenceOutput, MattingModel};
use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use crate::mask::ModelMatte;
use ndarray::{ArrayViewD, IxDyn};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::fmt::Display;
use std::path::Path;

fn unavailable(e: impl Display) -> Error {
    Error::InferenceUnavailable(e.to_string())
}

fn failed(e: impl Display) -> Error {
    Error::InferenceFailed(e.to_string())
}

/// MODNet portrait matting model
///
/// Single image input, single `[1, 1, H, W]` alpha matte output at the input resolution.
pub struct ModnetMatting {
    session: Session,
    preprocessor: Preprocessor,
}

impl ModnetMatting {
    /// Create a new MODNet model from an ONNX file
    ///
    /// # Arguments
    /// * `model_path` - Path to the ONNX model file
    /// * `input_size` - Square input edge, a multiple of 32 (512 is the reference size)
    pub fn new<P: AsRef<Path>>(model_path: P, input_size: u32) -> Result<Self> {
        let path = model_path.as_ref();

        tracing::info!("Loading MODNet model from {}", path.display());

        let session = Session::builder()
            .map_err(unavailable)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(unavailable)?
            .with_intra_threads(4)
            .map_err(unavailable)?
            .commit_from_file(path)
            .map_err(|e| unavailable(format!("{}: {e}", path.display())))?;

        tracing::info!("MODNet model loaded successfully");

        // MODNet expects RGB normalized to [-1, 1]
        let preprocessor = Preprocessor::new(input_size, input_size).normalized(0.5, 0.5);

        Ok(Self {
            session,
            preprocessor,
        })
    }
}

impl MattingModel for ModnetMatting {
    fn infer(&mut self, image: &PixelBuffer) -> Result<InferenceOutput> {
        let _span = tracing::debug_span!("modnet_infer").entered();

        let input = self.preprocessor.preprocess(image);
        let shape: Vec<usize> = input.shape().to_vec();
        let data = input.into_raw_vec();

        let tensor = Tensor::from_array((shape, data)).map_err(failed)?;

        let _infer_span = tracing::debug_span!("inference").entered();
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .map_err(failed)?;
        drop(_infer_span);

        // Alpha matte is the only output, shape [1, 1, H, W]
        let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(failed)?;
        let dims: Vec<usize> = shape.iter().map(|&d| d.max(0) as usize).collect();
        let view = ArrayViewD::from_shape(IxDyn(&dims), data).map_err(failed)?;

        let matte = ModelMatte::from_tensor(view)
            .map_err(|e| Error::InferenceFailed(format!("malformed matte: {e}")))?;
        Ok(InferenceOutput::Matte(matte))
    }

    fn input_size(&self) -> (u32, u32) {
        self.preprocessor.target_size()
    }
}
