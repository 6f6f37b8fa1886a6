//! Mask-driven background removal.
//!
//! An image is decoded into a [`PixelBuffer`], a [`MaskSource`] decides per pixel what
//! survives (model matte, segmentation mask, or a hand-painted mask), [`composite`]
//! writes that into the alpha channel, and [`export::encode`] turns the result into PNG.

pub mod buffer;
pub mod composite;
pub mod config;
pub mod error;
pub mod export;
pub mod inference;
pub mod mapping;
pub mod mask;
pub mod paint;
pub mod session;

pub use buffer::{Channel, PixelBuffer, Resample};
pub use composite::composite;
pub use config::EditorConfig;
pub use error::{Error, Result};
pub use export::EncodedImage;
pub use inference::{InferenceOutput, MattingModel};
pub use mapping::{BufferPoint, DisplayRect};
pub use mask::{MaskSource, ModelMatte, OpacityMask, SegmentationMask};
pub use paint::{BrushPaintEngine, BrushState, PaintedMask};
pub use session::{EditorSession, Generation, ProcessOutcome, ProcessTicket};
