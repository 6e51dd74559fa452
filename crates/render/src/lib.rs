//! SVG View Render Library
//!
//! Resource identifiers, drawable handles and the decoders that produce them.

pub mod assets;
pub mod drawable;
pub mod error;
pub mod loader;
pub mod raster;
pub mod resource;
pub mod svg;

pub use assets::{AssetSource, DirectoryAssets, MemoryAssets};
pub use drawable::{Bitmap, Drawable, Picture, ViewBox};
pub use error::{DecodeError, DecodeResult};
pub use loader::ResourceLoader;
pub use raster::{ImageRasterLoader, RasterLoader};
pub use resource::{RasterId, Resource, VectorId};
pub use svg::{SvgDecoder, VectorDecoder};
