//! SVG View
//!
//! An image view that displays SVG or raster resources, with decoded
//! drawables shared through a memory-bounded LRU cache.

pub mod attributes;
pub mod surface;
pub mod view;

pub use attributes::{AttributeError, ViewAttributes};
pub use surface::{DisplaySurface, ImageSurface};
pub use view::{prefetch, DrawableCache, SvgView};

pub use svg_view_cache::{CacheConfig, MemoryBudget};
pub use svg_view_render::{Drawable, Resource, ResourceLoader};
