mod matte_file;
#[cfg(feature = "onnx")]
mod modnet;
mod preprocess;
pub mod types;

pub use matte_file::MatteImage;
#[cfg(feature = "onnx")]
pub use modnet::ModnetMatting;
pub use preprocess::Preprocessor;
pub use types::{InferenceOutput, MattingModel, OutputKind};

use crate::error::Result;
use std::path::Path;

/// Create the default matting model (MODNet on ONNX Runtime).
#[cfg(feature = "onnx")]
pub fn create_default_model(model_path: &Path, input_size: u32) -> Result<Box<dyn MattingModel>> {
    let model = ModnetMatting::new(model_path, input_size)?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
pub fn create_default_model(model_path: &Path, _input_size: u32) -> Result<Box<dyn MattingModel>> {
    Err(crate::error::Error::InferenceUnavailable(format!(
        "cannot load {}: built without the `onnx` feature",
        model_path.display()
    )))
}
