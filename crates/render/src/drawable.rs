//! Decoded drawable handles
//!
//! A [`Drawable`] is a reference-counted handle, so the cache and the surface
//! can hold the same decoded data without copying it. The bitmap buffer is
//! freed when the last handle goes away.

use std::sync::Arc;

use svg_view_cache::EntryCost;

/// SVG view box (`min-x min-y width height`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

/// A recorded vector picture
///
/// Holds the parsed document's intrinsic geometry and its markup. Drawing it
/// is the surface's business.
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    /// Intrinsic width in pixels
    pub width: f32,

    /// Intrinsic height in pixels
    pub height: f32,

    /// View box declared by the document, if any
    pub view_box: Option<ViewBox>,

    /// Number of elements in the document, root included
    pub element_count: usize,

    markup: Arc<str>,
}

impl Picture {
    pub fn new(
        width: f32,
        height: f32,
        view_box: Option<ViewBox>,
        element_count: usize,
        markup: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            width,
            height,
            view_box,
            element_count,
            markup: markup.into(),
        }
    }

    /// Source markup of the document
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl EntryCost for Picture {
    fn byte_size(&self) -> usize {
        self.markup.len()
    }
}

/// A decoded raster image in RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from RGBA8 pixel data
    ///
    /// Returns `None` if `pixels` does not hold exactly `width * height * 4`
    /// bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (pixels.len() == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Raw RGBA8 pixels
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl EntryCost for Bitmap {
    fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

/// Handle to decoded image data bound to a surface
#[derive(Debug, Clone)]
pub enum Drawable {
    Picture(Arc<Picture>),
    Bitmap(Arc<Bitmap>),
}

impl Drawable {
    /// Intrinsic size in pixels
    pub fn intrinsic_size(&self) -> (f32, f32) {
        match self {
            Drawable::Picture(picture) => (picture.width, picture.height),
            Drawable::Bitmap(bitmap) => (bitmap.width as f32, bitmap.height as f32),
        }
    }

    pub fn as_bitmap(&self) -> Option<&Arc<Bitmap>> {
        match self {
            Drawable::Bitmap(bitmap) => Some(bitmap),
            Drawable::Picture(_) => None,
        }
    }

    pub fn as_picture(&self) -> Option<&Arc<Picture>> {
        match self {
            Drawable::Picture(picture) => Some(picture),
            Drawable::Bitmap(_) => None,
        }
    }

    /// Whether both handles point at the same decoded data
    pub fn ptr_eq(&self, other: &Drawable) -> bool {
        match (self, other) {
            (Drawable::Picture(a), Drawable::Picture(b)) => Arc::ptr_eq(a, b),
            (Drawable::Bitmap(a), Drawable::Bitmap(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of live handles to the decoded data
    pub fn handle_count(&self) -> usize {
        match self {
            Drawable::Picture(picture) => Arc::strong_count(picture),
            Drawable::Bitmap(bitmap) => Arc::strong_count(bitmap),
        }
    }
}

impl From<Picture> for Drawable {
    fn from(picture: Picture) -> Self {
        Drawable::Picture(Arc::new(picture))
    }
}

impl From<Bitmap> for Drawable {
    fn from(bitmap: Bitmap) -> Self {
        Drawable::Bitmap(Arc::new(bitmap))
    }
}

impl EntryCost for Drawable {
    fn byte_size(&self) -> usize {
        match self {
            Drawable::Picture(picture) => picture.byte_size(),
            Drawable::Bitmap(bitmap) => bitmap.byte_size(),
        }
    }
}
