use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;

use photorepo_asset::{ImageTransform, TransformError};

/// Default thumbnail width in pixels.
pub const DEFAULT_WIDTH: u32 = 500;

/// Default JPEG quality of thumbnails.
pub const DEFAULT_QUALITY: u8 = 20;

/// Rotates an image upright, scales it down to a fixed width and re-encodes
/// it as JPEG.
#[derive(Debug, Clone, Copy)]
pub struct ResizeTransform {
    width: u32,
    quality: u8,
}

impl Default for ResizeTransform {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_QUALITY)
    }
}

impl ResizeTransform {
    #[must_use]
    pub fn new(width: u32, quality: u8) -> Self {
        Self {
            width: width.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Synchronous core of [`ImageTransform::downsize`].
    ///
    /// Images narrower than the target width keep their size.
    pub fn render(&self, data: &[u8], orientation: Option<u16>) -> Result<Vec<u8>, TransformError> {
        let img = image::load_from_memory(data).map_err(|e| TransformError::Decode(e.to_string()))?;
        let img = upright(img, orientation);

        let img = if img.width() > self.width {
            let height = scaled_height(img.width(), img.height(), self.width);
            img.resize_exact(self.width, height, FilterType::Lanczos3)
        } else {
            img
        };

        let rgb = img.to_rgb8();
        let mut out = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut out, self.quality)
            .encode_image(&rgb)
            .map_err(|e| TransformError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }
}

#[async_trait]
impl ImageTransform for ResizeTransform {
    async fn downsize(
        &self,
        data: Bytes,
        orientation: Option<u16>,
    ) -> Result<Bytes, TransformError> {
        let transform = *self;
        tokio::task::spawn_blocking(move || transform.render(&data, orientation))
            .await
            .map_err(|e| TransformError::Task(e.to_string()))?
            .map(Bytes::from)
    }
}

/// Undo the camera rotation recorded in an EXIF orientation code.
///
/// Mirrored codes get the same rotation as their unmirrored pair.
fn upright(img: DynamicImage, orientation: Option<u16>) -> DynamicImage {
    match orientation {
        Some(3 | 4) => img.rotate180(),
        Some(5 | 6) => img.rotate90(),
        Some(7 | 8) => img.rotate270(),
        _ => img,
    }
}

fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = u64::from(height) * u64::from(target_width) / u64::from(width.max(1));
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use image::{ImageFormat, RgbImage};

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([u8::try_from(x % 256).unwrap(), u8::try_from(y % 256).unwrap(), 128])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn dimensions(jpeg: &[u8]) -> (u32, u32) {
        assert_eq!(image::guess_format(jpeg).unwrap(), ImageFormat::Jpeg);
        let img = image::load_from_memory(jpeg).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn scales_to_target_width_keeping_aspect() {
        let out = ResizeTransform::default().render(&png(1000, 600), None).unwrap();
        assert_eq!(dimensions(&out), (500, 300));
    }

    #[test]
    fn quarter_turn_orientation_swaps_axes() {
        let out = ResizeTransform::new(100, 80)
            .render(&png(400, 200), Some(6))
            .unwrap();
        assert_eq!(dimensions(&out), (100, 200));

        let out = ResizeTransform::new(100, 80)
            .render(&png(400, 200), Some(8))
            .unwrap();
        assert_eq!(dimensions(&out), (100, 200));
    }

    #[test]
    fn half_turn_keeps_axes() {
        let out = ResizeTransform::new(100, 80)
            .render(&png(400, 200), Some(3))
            .unwrap();
        assert_eq!(dimensions(&out), (100, 50));
    }

    #[test]
    fn never_upscales() {
        let out = ResizeTransform::default().render(&png(120, 80), None).unwrap();
        assert_eq!(dimensions(&out), (120, 80));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = ResizeTransform::default()
            .render(b"not an image", None)
            .unwrap_err();
        assert!(matches!(err, TransformError::Decode(_)));
    }

    #[test]
    fn settings_are_clamped() {
        let t = ResizeTransform::new(0, 0);
        assert_eq!(t.width(), 1);
        assert_eq!(t.quality(), 1);
        assert_eq!(ResizeTransform::new(10, 200).quality(), 100);
    }

    #[tokio::test]
    async fn downsize_runs_off_the_runtime() {
        let out = ResizeTransform::new(50, 50)
            .downsize(Bytes::from(png(200, 100)), None)
            .await
            .unwrap();
        assert_eq!(dimensions(&out), (50, 25));
    }
}
