//! Raster loader
//!
//! Decodes bundled raster assets (PNG) into RGBA8 bitmaps.

use crate::assets::AssetSource;
use crate::drawable::Bitmap;
use crate::error::{DecodeError, DecodeResult};
use crate::resource::RasterId;

/// Turns a raster resource into a bitmap
pub trait RasterLoader: Send + Sync {
    fn load(&self, id: RasterId) -> DecodeResult<Bitmap>;
}

/// Raster loader backed by the `image` crate
#[derive(Debug, Clone)]
pub struct ImageRasterLoader<A> {
    assets: A,
}

impl<A: AssetSource> ImageRasterLoader<A> {
    pub fn new(assets: A) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }
}

impl<A: AssetSource> RasterLoader for ImageRasterLoader<A> {
    fn load(&self, RasterId(id): RasterId) -> DecodeResult<Bitmap> {
        let bytes = self.assets.load(id)?.ok_or(DecodeError::NotFound(id))?;
        decode_bitmap(id, &bytes)
    }
}

/// Decode encoded image bytes into an RGBA8 bitmap
pub fn decode_bitmap(id: u32, bytes: &[u8]) -> DecodeResult<Bitmap> {
    let image = image::load_from_memory(bytes)
        .map_err(|source| DecodeError::Image { id, source })?
        .to_rgba8();

    let (width, height) = image.dimensions();
    Bitmap::new(width, height, image.into_raw()).ok_or_else(|| DecodeError::Parse {
        id,
        reason: format!("decoded buffer does not match {}x{} RGBA", width, height),
    })
}
