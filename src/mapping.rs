//! Display space to buffer space conversion for pointer input.
//!
//! The paint surface is usually shown at a different size than its backing buffer
//! (responsive layout, device pixel ratio), so every pointer position has to be scaled
//! by `buffer / displayed` on each axis before it touches the mask.

/// On-screen bounding rectangle of the paint surface, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A point in buffer pixel space. May lie outside the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferPoint {
    pub x: f32,
    pub y: f32,
}

impl BufferPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// A collapsed rect (hidden element, not yet laid out) maps 1:1 instead of dividing by zero.
fn axis_scale(buffer_len: u32, displayed: f32) -> f32 {
    if displayed > 0.0 && displayed.is_finite() {
        buffer_len as f32 / displayed
    } else {
        1.0
    }
}

/// Map a client-space pointer position into buffer space.
pub fn to_buffer(client_x: f32, client_y: f32, rect: &DisplayRect, buffer: (u32, u32)) -> BufferPoint {
    let (width, height) = buffer;
    BufferPoint {
        x: (client_x - rect.left) * axis_scale(width, rect.width),
        y: (client_y - rect.top) * axis_scale(height, rect.height),
    }
}

/// Like [`to_buffer`], but snapped to a pixel index.
///
/// Points outside the buffer return `None`; callers drop them.
pub fn to_buffer_pixel(
    client_x: f32,
    client_y: f32,
    rect: &DisplayRect,
    buffer: (u32, u32),
) -> Option<(u32, u32)> {
    let point = to_buffer(client_x, client_y, rect, buffer);
    if !(point.x >= 0.0 && point.y >= 0.0) {
        return None;
    }
    let (x, y) = (point.x.floor() as u32, point.y.floor() as u32);
    (x < buffer.0 && y < buffer.1).then_some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_by_buffer_over_display() {
        let rect = DisplayRect::new(10.0, 20.0, 200.0, 150.0);
        let point = to_buffer(60.0, 50.0, &rect, (800, 600));
        assert_eq!(point, BufferPoint::new(200.0, 120.0));
    }

    #[test]
    fn unscaled_surface_is_offset_only() {
        let rect = DisplayRect::new(5.0, 5.0, 100.0, 100.0);
        assert_eq!(to_buffer(5.0, 105.0, &rect, (100, 100)), BufferPoint::new(0.0, 100.0));
    }

    #[test]
    fn collapsed_rect_does_not_divide_by_zero() {
        let rect = DisplayRect::new(0.0, 0.0, 0.0, 0.0);
        let point = to_buffer(3.0, 4.0, &rect, (10, 10));
        assert_eq!(point, BufferPoint::new(3.0, 4.0));
    }

    #[test]
    fn pixel_snap_drops_outside_points() {
        let rect = DisplayRect::new(0.0, 0.0, 50.0, 50.0);
        assert_eq!(to_buffer_pixel(-1.0, 10.0, &rect, (100, 100)), None);
        assert_eq!(to_buffer_pixel(50.0, 10.0, &rect, (100, 100)), None);
        assert_eq!(to_buffer_pixel(49.9, 0.2, &rect, (100, 100)), Some((99, 0)));
    }
}
