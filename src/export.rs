use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

pub const PNG_MIME: &str = "image/png";
pub const DEFAULT_FILE_NAME: &str = "processed-image.png";

/// Encoded image ready to hand to whatever triggers the download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub file_name: &'static str,
}

/// Encode as RGBA8 PNG. Lossless, so the alpha channel survives exactly.
pub fn encode(buffer: &PixelBuffer) -> Result<EncodedImage> {
    let (width, height) = buffer.dimensions();
    let _span = tracing::debug_span!("encode_png", width, height).entered();

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(buffer.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(Error::EncodeError)?;

    Ok(EncodedImage {
        bytes,
        mime_type: PNG_MIME,
        file_name: DEFAULT_FILE_NAME,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_lossless() {
        let data: Vec<u8> = (0..7 * 5 * 4).map(|i| (i * 37 % 256) as u8).collect();
        let buffer = PixelBuffer::from_raw(7, 5, data).unwrap();

        let encoded = encode(&buffer).unwrap();
        assert_eq!(encoded.mime_type, "image/png");
        assert!(encoded.bytes.starts_with(&[0x89, b'P', b'N', b'G']));

        let decoded = image::load_from_memory(&encoded.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (7, 5));
        assert_eq!(decoded.as_raw(), buffer.as_raw());
    }

    #[test]
    fn fully_transparent_pixels_keep_their_colour() {
        let buffer = PixelBuffer::filled(2, 2, [200, 100, 50, 0]).unwrap();
        let encoded = encode(&buffer).unwrap();
        let decoded = PixelBuffer::from_decoded_image(&encoded.bytes).unwrap();
        assert_eq!(decoded.pixel(1, 1).unwrap(), [200, 100, 50, 0]);
    }
}
