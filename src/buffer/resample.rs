use image::imageops::{self, FilterType};
use image::GrayImage;

/// Resampling filter shared by image resizing and matte fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resample {
    Nearest,
    #[default]
    Bilinear,
}

impl Resample {
    pub(crate) fn filter(self) -> FilterType {
        match self {
            Resample::Nearest => FilterType::Nearest,
            Resample::Bilinear => FilterType::Triangle,
        }
    }
}

/// Resize a single-channel plane, returning it untouched when the size already matches.
pub(crate) fn resize_plane(plane: &GrayImage, width: u32, height: u32, resample: Resample) -> GrayImage {
    if plane.dimensions() == (width, height) {
        return plane.clone();
    }

    let _span = tracing::debug_span!("resize_plane", width, height).entered();
    imageops::resize(plane, width, height, resample.filter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn same_size_is_identity() {
        let plane = GrayImage::from_fn(3, 2, |x, y| Luma([(x * 10 + y) as u8]));
        let out = resize_plane(&plane, 3, 2, Resample::Bilinear);
        assert_eq!(out.as_raw(), plane.as_raw());
    }

    #[test]
    fn nearest_upscale_repeats_values() {
        let plane = GrayImage::from_raw(2, 1, vec![0, 255]).unwrap();
        let out = resize_plane(&plane, 4, 1, Resample::Nearest);
        assert_eq!(out.as_raw(), &vec![0, 0, 255, 255]);
    }

    #[test]
    fn uniform_plane_stays_uniform_under_bilinear() {
        let plane = GrayImage::from_pixel(4, 4, Luma([200]));
        let out = resize_plane(&plane, 9, 7, Resample::Bilinear);
        assert_eq!(out.dimensions(), (9, 7));
        assert!(out.pixels().all(|p| p[0] == 200));
    }
}
