// Texture helpers shared by the gallery and the lightbox

use gdk4::{MemoryFormat, MemoryTexture, Texture};
use gtk4::prelude::*;

use crate::models::Thumbnail;

/// Wrap tightly packed RGBA8 pixels in a GDK texture
pub fn texture_from_rgba(data: Vec<u8>, width: u32, height: u32) -> Option<Texture> {
    let expected = (width as u64)
        .saturating_mul(height as u64)
        .saturating_mul(4);
    if width == 0 || height == 0 || (data.len() as u64) < expected {
        tracing::debug!(
            "Skipping texture: data too small ({} bytes for {}x{})",
            data.len(),
            width,
            height
        );
        return None;
    }
    let bytes = glib::Bytes::from_owned(data);
    let texture = MemoryTexture::new(
        width as i32,
        height as i32,
        MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    Some(texture.upcast())
}

pub fn texture_from_thumbnail(thumbnail: &Thumbnail) -> Option<Texture> {
    texture_from_rgba(thumbnail.rgba.clone(), thumbnail.width, thumbnail.height)
}
