//! Display surfaces
//!
//! A surface owns the drawables bound to it: one foreground image and one
//! background. The foreground raster buffer can be force-released to reclaim
//! memory.

use std::sync::Arc;

use svg_view_cache::{BufferOwner, EntryCost};
use svg_view_render::Drawable;
use tracing::trace;

/// Something that presents drawables
pub trait DisplaySurface: BufferOwner {
    /// Bind `drawable` as the foreground content
    fn set_image(&mut self, drawable: Drawable);

    /// Bind `drawable` as the background
    fn set_background(&mut self, drawable: Drawable);

    /// Currently bound foreground content
    fn image(&self) -> Option<&Drawable>;

    /// Currently bound background
    fn background(&self) -> Option<&Drawable>;
}

/// In-process surface holding its bound drawables
#[derive(Debug, Default)]
pub struct ImageSurface {
    image: Option<Drawable>,
    background: Option<Drawable>,
    invalidations: u64,
}

impl ImageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the surface had to redraw because a binding changed
    pub fn invalidations(&self) -> u64 {
        self.invalidations
    }
}

impl DisplaySurface for ImageSurface {
    fn set_image(&mut self, drawable: Drawable) {
        self.image = Some(drawable);
        self.invalidations += 1;
    }

    fn set_background(&mut self, drawable: Drawable) {
        self.background = Some(drawable);
        self.invalidations += 1;
    }

    fn image(&self) -> Option<&Drawable> {
        self.image.as_ref()
    }

    fn background(&self) -> Option<&Drawable> {
        self.background.as_ref()
    }
}

impl BufferOwner for ImageSurface {
    /// Unbinds the foreground bitmap. Pictures hold no raster buffer and are
    /// left bound.
    ///
    /// Bytes are reported only when this surface held the last handle, since
    /// only then is the buffer actually freed.
    fn release_bound_buffer(&mut self) -> Option<usize> {
        if !matches!(self.image, Some(Drawable::Bitmap(_))) {
            return None;
        }
        let Some(Drawable::Bitmap(bitmap)) = self.image.take() else {
            return None;
        };
        self.invalidations += 1;

        match Arc::try_unwrap(bitmap) {
            Ok(bitmap) => {
                let bytes = bitmap.byte_size();
                trace!(bytes, "freed bound bitmap");
                Some(bytes)
            }
            Err(shared) => {
                trace!(
                    other_handles = Arc::strong_count(&shared) - 1,
                    "unbound bitmap still shared"
                );
                None
            }
        }
    }
}
