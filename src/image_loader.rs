use std::io::Cursor;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, GenericImageView, ImageFormat};

use crate::error::LoadError;
use crate::models::Thumbnail;

/// Decode an image, sniffing the format from its bytes rather than the file
/// name. Extensionless candidates depend on this.
pub fn open_image(path: &Path) -> Result<DynamicImage, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let format = image::guess_format(&bytes).ok();

    if format == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let mut frames = decoder.into_frames();
        return match frames.next() {
            Some(Ok(frame)) => Ok(DynamicImage::ImageRgba8(frame.into_buffer())),
            Some(Err(source)) => Err(LoadError::Decode {
                path: path.to_path_buf(),
                source,
            }),
            None => Err(LoadError::NoFrames {
                path: path.to_path_buf(),
            }),
        };
    }

    let decoded = match format {
        Some(fmt) => image::load_from_memory_with_format(&bytes, fmt),
        None => image::load_from_memory(&bytes),
    };
    decoded.map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Downscale so the longest side is at most `max_side`, keeping aspect ratio.
/// Images already small enough are converted without resampling.
pub fn to_rgba_bounded(img: &DynamicImage, max_side: u32) -> Thumbnail {
    let (width, height) = img.dimensions();
    let prepared = if width.max(height) > max_side && max_side > 0 {
        img.thumbnail(max_side, max_side)
    } else {
        img.clone()
    };

    let (out_w, out_h) = prepared.dimensions();
    Thumbnail {
        rgba: prepared.to_rgba8().into_raw(),
        width: out_w.max(1),
        height: out_h.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_sniffs_format_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo1");
        RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let img = open_image(&path).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo1.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let err = open_image(&path).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
        assert!(!err.is_missing());
    }

    #[test]
    fn test_missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_image(&dir.path().join("photo9.png")).unwrap_err();
        assert!(err.is_missing());
    }

    #[test]
    fn test_bounded_rgba_keeps_aspect_ratio() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(1000, 500));
        let thumb = to_rgba_bounded(&img, 100);
        assert_eq!((thumb.width, thumb.height), (100, 50));
        assert_eq!(thumb.rgba.len(), 100 * 50 * 4);

        let small = DynamicImage::ImageRgba8(RgbaImage::new(20, 10));
        let thumb = to_rgba_bounded(&small, 100);
        assert_eq!((thumb.width, thumb.height), (20, 10));
    }
}
