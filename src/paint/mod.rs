mod brush;
mod mask;

pub use brush::{BrushPaintEngine, BrushState};
pub use mask::PaintedMask;
