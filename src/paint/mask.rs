use crate::error::{Error, Result};
use crate::mapping::BufferPoint;
use image::{GrayImage, Luma};

const OPAQUE: u8 = 255;

/// Single-channel opacity mask authored with the brush.
///
/// Starts fully transparent. Painting only ever raises values to 255 and the only way
/// back down is [`PaintedMask::clear`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintedMask {
    plane: GrayImage,
}

impl PaintedMask {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            plane: GrayImage::new(width, height),
        })
    }

    pub fn width(&self) -> u32 {
        self.plane.width()
    }

    pub fn height(&self) -> u32 {
        self.plane.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.plane.dimensions()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.plane.as_raw()
    }

    pub fn value(&self, x: u32, y: u32) -> Option<u8> {
        self.plane.get_pixel_checked(x, y).map(|p| p[0])
    }

    /// True once at least one pixel has been painted.
    pub fn is_painted(&self) -> bool {
        self.plane.as_raw().iter().any(|&v| v != 0)
    }

    pub fn clear(&mut self) {
        self.plane.fill(0);
    }

    /// Set every pixel whose index lies within `radius` of `center` to full opacity.
    pub(crate) fn stamp_circle(&mut self, center: BufferPoint, radius: u32) {
        if !center.x.is_finite() || !center.y.is_finite() {
            return;
        }

        let (width, height) = self.dimensions();
        let r = radius as f32;
        let r2 = r * r;

        let min_x = (center.x - r).floor().max(0.0) as i64;
        let min_y = (center.y - r).floor().max(0.0) as i64;
        let max_x = ((center.x + r).ceil() as i64).min(width as i64 - 1);
        let max_y = ((center.y + r).ceil() as i64).min(height as i64 - 1);

        for y in min_y..=max_y {
            let dy = y as f32 - center.y;
            for x in min_x..=max_x {
                let dx = x as f32 - center.x;
                if dx * dx + dy * dy <= r2 {
                    self.plane.put_pixel(x as u32, y as u32, Luma([OPAQUE]));
                }
            }
        }
    }

    /// Stamp circles along the segment so a fast pointer leaves no gaps.
    ///
    /// Only the part of the segment within `radius` of the mask is walked, so the
    /// work stays proportional to the mask size however far the pointer travelled.
    pub(crate) fn stamp_segment(&mut self, from: BufferPoint, to: BufferPoint, radius: u32) {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let distance = (dx * dx + dy * dy).sqrt();
        let spacing = (radius as f32 * 0.5).max(0.5);

        if !distance.is_finite() || distance <= spacing {
            self.stamp_circle(to, radius);
            return;
        }

        let Some((start, end)) = self.clip_to_reach(from, to, radius) else {
            return;
        };
        let (dx, dy) = (end.x - start.x, end.y - start.y);
        let steps = ((dx * dx + dy * dy).sqrt() / spacing).ceil() as u32;
        // `from` was stamped by the previous call unless clipping moved the start.
        let first = u32::from(start != from);
        for step in (1 - first)..=steps {
            let t = if steps == 0 { 1.0 } else { step as f32 / steps as f32 };
            self.stamp_circle(BufferPoint::new(start.x + dx * t, start.y + dy * t), radius);
        }
    }

    /// Liang-Barsky clip of `from..to` against the mask grown by `radius` on each side.
    fn clip_to_reach(
        &self,
        from: BufferPoint,
        to: BufferPoint,
        radius: u32,
    ) -> Option<(BufferPoint, BufferPoint)> {
        let r = radius as f32;
        let (width, height) = self.dimensions();
        let (min_x, min_y) = (-r, -r);
        let (max_x, max_y) = (width as f32 - 1.0 + r, height as f32 - 1.0 + r);
        let (dx, dy) = (to.x - from.x, to.y - from.y);

        let mut t0 = 0.0f32;
        let mut t1 = 1.0f32;
        for (p, q) in [
            (-dx, from.x - min_x),
            (dx, max_x - from.x),
            (-dy, from.y - min_y),
            (dy, max_y - from.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |t: f32| BufferPoint::new(from.x + dx * t, from.y + dy * t);
        Some((at(t0), at(t1)))
    }
}
