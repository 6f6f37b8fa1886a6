mod pixel;
mod resample;

pub use pixel::{Channel, PixelBuffer};
pub use resample::Resample;

pub(crate) use resample::resize_plane;
