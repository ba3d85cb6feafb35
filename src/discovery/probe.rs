use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use image::GenericImageView;
use tokio::runtime::Handle;

use crate::error::LoadError;
use crate::image_loader;
use crate::models::Thumbnail;

/// Target size for gallery thumbnails (pixels on longest side).
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 512;

/// What a successful probe learned about a candidate.
#[derive(Debug, Clone)]
pub struct ProbedImage {
    pub width: u32,
    pub height: u32,
    pub thumbnail: Option<Arc<Thumbnail>>,
}

/// Existence check for a single candidate file.
///
/// `Ok` means the candidate is a loadable image. Any `Err` is the normal
/// signal to try the next candidate.
pub trait PhotoProbe {
    fn probe(&self, path: &Path) -> impl Future<Output = Result<ProbedImage, LoadError>>;
}

/// Probe that decodes candidates from disk on the tokio blocking pool.
#[derive(Debug, Clone)]
pub struct FsProbe {
    runtime: Handle,
    thumbnail_size: u32,
}

impl FsProbe {
    pub fn new(runtime: Handle, thumbnail_size: u32) -> Self {
        Self {
            runtime,
            thumbnail_size,
        }
    }

    fn probe_blocking(path: &Path, thumbnail_size: u32) -> Result<ProbedImage, LoadError> {
        let img = image_loader::open_image(path)?;
        let (width, height) = img.dimensions();
        let thumbnail = image_loader::to_rgba_bounded(&img, thumbnail_size);
        Ok(ProbedImage {
            width,
            height,
            thumbnail: Some(Arc::new(thumbnail)),
        })
    }
}

impl PhotoProbe for FsProbe {
    async fn probe(&self, path: &Path) -> Result<ProbedImage, LoadError> {
        let owned = path.to_path_buf();
        let thumbnail_size = self.thumbnail_size;
        self.runtime
            .spawn_blocking(move || Self::probe_blocking(&owned, thumbnail_size))
            .await
            .map_err(|_| LoadError::Interrupted {
                path: path.to_path_buf(),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    #[tokio::test]
    async fn test_decodes_real_files_and_rejects_the_rest() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("photo1.png");
        RgbaImage::from_pixel(800, 400, Rgba([200, 10, 10, 255]))
            .save_with_format(&good, ImageFormat::Png)
            .unwrap();
        let bad = dir.path().join("photo2.jpg");
        std::fs::write(&bad, b"not an image").unwrap();

        let probe = FsProbe::new(Handle::current(), 100);

        let probed = probe.probe(&good).await.unwrap();
        assert_eq!((probed.width, probed.height), (800, 400));
        let thumb = probed.thumbnail.unwrap();
        assert_eq!((thumb.width, thumb.height), (100, 50));

        assert!(probe.probe(&bad).await.is_err());
        assert!(probe.probe(&dir.path().join("photo3.webp")).await.unwrap_err().is_missing());
    }
}
