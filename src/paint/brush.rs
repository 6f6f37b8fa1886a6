use super::PaintedMask;
use crate::error::{Error, Result};
use crate::mapping::BufferPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushState {
    Idle,
    Painting,
}

/// Accumulates brush strokes into a [`PaintedMask`].
///
/// Every call is a silent no-op until [`BrushPaintEngine::allocate`] has been called,
/// which happens once the image being edited has finished loading.
#[derive(Debug)]
pub struct BrushPaintEngine {
    mask: Option<PaintedMask>,
    state: BrushState,
    radius: u32,
    last: Option<BufferPoint>,
}

impl BrushPaintEngine {
    pub fn new(radius: u32) -> Result<Self> {
        if radius == 0 {
            return Err(Error::InvalidBrushRadius);
        }
        Ok(Self {
            mask: None,
            state: BrushState::Idle,
            radius,
            last: None,
        })
    }

    /// Replace the mask with a fresh transparent one. Any stroke in progress is dropped.
    pub fn allocate(&mut self, width: u32, height: u32) -> Result<()> {
        self.mask = Some(PaintedMask::new(width, height)?);
        self.end_stroke();
        Ok(())
    }

    /// Drop the mask entirely, e.g. when the session is reset.
    pub fn release(&mut self) {
        self.mask = None;
        self.end_stroke();
    }

    pub fn state(&self) -> BrushState {
        self.state
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Takes effect from the next stamped segment; already painted pixels are untouched.
    pub fn set_radius(&mut self, radius: u32) -> Result<()> {
        if radius == 0 {
            return Err(Error::InvalidBrushRadius);
        }
        self.radius = radius;
        Ok(())
    }

    pub fn mask(&self) -> Option<&PaintedMask> {
        self.mask.as_ref()
    }

    pub fn begin_stroke(&mut self, point: BufferPoint) {
        let Some(mask) = self.mask.as_mut() else {
            return;
        };
        mask.stamp_circle(point, self.radius);
        self.state = BrushState::Painting;
        self.last = Some(point);
    }

    /// Extend the current stroke to `point`.
    ///
    /// A move paints more than one circle: circles spaced at half the radius are
    /// stamped along the segment from the previous point, so the stroke has no gaps
    /// however far the pointer jumped. Ignored unless a stroke is in progress.
    pub fn move_stroke(&mut self, point: BufferPoint) {
        if self.state != BrushState::Painting {
            return;
        }
        let Some(mask) = self.mask.as_mut() else {
            return;
        };
        match self.last {
            Some(last) => mask.stamp_segment(last, point, self.radius),
            None => mask.stamp_circle(point, self.radius),
        }
        self.last = Some(point);
    }

    pub fn end_stroke(&mut self) {
        self.state = BrushState::Idle;
        self.last = None;
    }

    /// The pointer left the paint surface; treated exactly like releasing it.
    pub fn pointer_leave(&mut self) {
        self.end_stroke();
    }

    /// Reset every pixel to transparent without touching the stroke state.
    pub fn clear(&mut self) {
        if let Some(mask) = self.mask.as_mut() {
            mask.clear();
        }
    }
}
