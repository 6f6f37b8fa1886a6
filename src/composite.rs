use crate::buffer::{PixelBuffer, Resample};
use crate::error::Result;
use crate::mask::MaskSource;

/// Copy `source` and replace its alpha channel with the mask's opacity.
///
/// Colour channels are carried over byte for byte. The mask is fully resolved before the
/// output is allocated, so a failure never leaves a half-written image behind.
pub fn composite(source: &PixelBuffer, mask: &MaskSource, resample: Resample) -> Result<PixelBuffer> {
    let (width, height) = source.dimensions();
    let _span = tracing::debug_span!("composite", width, height, mask = mask.kind()).entered();

    let opacity = mask.resolve(width, height, resample)?;

    let mut data = source.as_raw().to_vec();
    for (pixel, &alpha) in data.chunks_exact_mut(4).zip(opacity.values()) {
        pixel[3] = alpha;
    }

    PixelBuffer::from_raw(width, height, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mask::{ModelMatte, SegmentationMask};
    use crate::paint::PaintedMask;

    fn alpha_channel(buffer: &PixelBuffer) -> Vec<u8> {
        buffer.as_raw().chunks_exact(4).map(|p| p[3]).collect()
    }

    fn rgb_channels(buffer: &PixelBuffer) -> Vec<u8> {
        buffer
            .as_raw()
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect()
    }

    #[test]
    fn white_square_with_half_matte() {
        let source = PixelBuffer::filled(2, 2, [255, 255, 255, 255]).unwrap();
        let matte = ModelMatte::new(2, 2, vec![1.0, 1.0, 0.0, 0.0]).unwrap();

        let output = composite(&source, &matte.into(), Resample::Bilinear).unwrap();
        assert_eq!(alpha_channel(&output), vec![255, 255, 0, 0]);
        assert_eq!(rgb_channels(&output), rgb_channels(&source));
    }

    #[test]
    fn colour_is_preserved_for_every_source() {
        let data: Vec<u8> = (0..3 * 2 * 4).map(|i| (i * 11 % 256) as u8).collect();
        let source = PixelBuffer::from_raw(3, 2, data).unwrap();

        let sources: Vec<MaskSource> = vec![
            ModelMatte::new(3, 2, vec![0.5; 6]).unwrap().into(),
            SegmentationMask::new(3, 2, vec![0.1; 6]).unwrap().into(),
            PaintedMask::new(3, 2).unwrap().into(),
        ];

        for mask in &sources {
            let output = composite(&source, mask, Resample::Bilinear).unwrap();
            assert_eq!(output.dimensions(), source.dimensions());
            assert_eq!(rgb_channels(&output), rgb_channels(&source), "{}", mask.kind());
        }
    }

    #[test]
    fn segmentation_inverts() {
        let source = PixelBuffer::filled(2, 1, [1, 2, 3, 255]).unwrap();
        let mask = SegmentationMask::new(2, 1, vec![0.0, 1.0]).unwrap();
        let output = composite(&source, &mask.into(), Resample::Bilinear).unwrap();
        assert_eq!(alpha_channel(&output), vec![255, 0]);
    }

    #[test]
    fn low_resolution_matte_is_upsampled() {
        let source = PixelBuffer::filled(8, 6, [9, 9, 9, 255]).unwrap();
        let matte = ModelMatte::new(2, 2, vec![1.0; 4]).unwrap();
        let output = composite(&source, &matte.into(), Resample::Bilinear).unwrap();
        assert!(alpha_channel(&output).iter().all(|&a| a == 255));
    }

    #[test]
    fn mismatched_painted_mask_fails() {
        let source = PixelBuffer::allocate(4, 4).unwrap();
        let mask = PaintedMask::new(2, 2).unwrap();
        assert!(matches!(
            composite(&source, &mask.into(), Resample::Bilinear),
            Err(Error::InvalidMaskShape(_))
        ));
    }
}
