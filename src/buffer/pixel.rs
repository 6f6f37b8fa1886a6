use super::Resample;
use crate::error::{Error, Result};
use image::{imageops, Rgba, RgbaImage};

/// One of the four interleaved channels of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    Alpha = 3,
}

/// Row-major RGBA8 image, the canonical in-memory representation.
///
/// Width and height are always non-zero and the backing storage always holds exactly
/// `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    Ok(())
}

impl PixelBuffer {
    /// Allocate a fully transparent black canvas.
    pub fn allocate(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    /// Wrap raw RGBA bytes. The length must be exactly `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_dimensions(width, height)?;
        if data.len() as u64 != width as u64 * height as u64 * 4 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let image =
            RgbaImage::from_raw(width, height, data).ok_or(Error::InvalidDimensions { width, height })?;
        Ok(Self { image })
    }

    /// Decode an encoded image (PNG, JPEG, ...) into RGBA8.
    pub fn from_decoded_image(bytes: &[u8]) -> Result<Self> {
        let _span = tracing::debug_span!("decode", len = bytes.len()).entered();

        let decoded = image::load_from_memory(bytes).map_err(Error::DecodeError)?;
        Self::from_rgba_image(decoded.to_rgba8())
    }

    pub fn from_rgba_image(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        check_dimensions(width, height)?;
        Ok(Self { image })
    }

    /// Fill every pixel with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(Error::OutOfBounds { x, y, width, height });
        }
        Ok(())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Result<[u8; 4]> {
        self.check_bounds(x, y)?;
        Ok(self.image.get_pixel(x, y).0)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> Result<()> {
        self.check_bounds(x, y)?;
        self.image.put_pixel(x, y, Rgba(rgba));
        Ok(())
    }

    pub fn channel(&self, x: u32, y: u32, channel: Channel) -> Result<u8> {
        Ok(self.pixel(x, y)?[channel as usize])
    }

    pub fn set_channel(&mut self, x: u32, y: u32, channel: Channel, value: u8) -> Result<()> {
        self.check_bounds(x, y)?;
        self.image.get_pixel_mut(x, y).0[channel as usize] = value;
        Ok(())
    }

    /// Produce a resized copy. The source buffer is never modified.
    pub fn resize(&self, width: u32, height: u32, resample: Resample) -> Result<Self> {
        check_dimensions(width, height)?;
        if self.dimensions() == (width, height) {
            return Ok(self.clone());
        }

        let _span = tracing::debug_span!("resize", width, height).entered();
        Ok(Self {
            image: imageops::resize(&self.image, width, height, resample.filter()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn allocate_rejects_zero_sizes() {
        assert!(matches!(
            PixelBuffer::allocate(0, 4),
            Err(Error::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(matches!(
            PixelBuffer::allocate(4, 0),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn allocate_is_transparent_and_sized() {
        let buffer = PixelBuffer::allocate(3, 2).unwrap();
        assert_eq!(buffer.as_raw().len(), 3 * 2 * 4);
        assert!(buffer.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_err());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 17]).is_err());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn decode_rejects_garbage() {
        let result = PixelBuffer::from_decoded_image(b"definitely not an image");
        assert!(matches!(result, Err(Error::DecodeError(_))));
    }

    #[test]
    fn decode_png() {
        let source = RgbaImage::from_pixel(5, 3, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let buffer = PixelBuffer::from_decoded_image(&bytes).unwrap();
        assert_eq!(buffer.dimensions(), (5, 3));
        assert_eq!(buffer.pixel(4, 2).unwrap(), [10, 20, 30, 255]);
    }

    #[test]
    fn pixel_access_is_bounds_checked() {
        let mut buffer = PixelBuffer::allocate(2, 2).unwrap();
        assert!(matches!(
            buffer.pixel(2, 0),
            Err(Error::OutOfBounds { x: 2, y: 0, .. })
        ));
        assert!(buffer.set_pixel(0, 2, [1, 2, 3, 4]).is_err());
        assert!(buffer.set_channel(5, 5, Channel::Alpha, 9).is_err());

        buffer.set_pixel(1, 1, [1, 2, 3, 4]).unwrap();
        buffer.set_channel(1, 1, Channel::Green, 99).unwrap();
        assert_eq!(buffer.pixel(1, 1).unwrap(), [1, 99, 3, 4]);
        assert_eq!(buffer.channel(1, 1, Channel::Alpha).unwrap(), 4);
    }

    #[test]
    fn resize_leaves_source_alone() {
        let source = PixelBuffer::filled(2, 2, [7, 8, 9, 255]).unwrap();
        let resized = source.resize(4, 6, Resample::Nearest).unwrap();

        assert_eq!(source.dimensions(), (2, 2));
        assert_eq!(resized.dimensions(), (4, 6));
        assert_eq!(resized.pixel(3, 5).unwrap(), [7, 8, 9, 255]);
        assert!(source.resize(0, 1, Resample::Bilinear).is_err());
    }
}
