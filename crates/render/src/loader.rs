//! Dispatch from a resource to the decoder for its kind

use std::fmt;
use std::sync::Arc;

use crate::assets::AssetSource;
use crate::drawable::Drawable;
use crate::error::DecodeResult;
use crate::raster::{ImageRasterLoader, RasterLoader};
use crate::resource::Resource;
use crate::svg::{SvgDecoder, VectorDecoder};

/// Loads any [`Resource`] into a [`Drawable`]
#[derive(Clone)]
pub struct ResourceLoader {
    vector: Arc<dyn VectorDecoder>,
    raster: Arc<dyn RasterLoader>,
}

impl ResourceLoader {
    pub fn new(vector: Arc<dyn VectorDecoder>, raster: Arc<dyn RasterLoader>) -> Self {
        Self { vector, raster }
    }

    /// SVG and PNG decoding over a single asset source
    pub fn from_assets<A: AssetSource + 'static>(assets: Arc<A>) -> Self {
        Self::new(
            Arc::new(SvgDecoder::new(Arc::clone(&assets))),
            Arc::new(ImageRasterLoader::new(assets)),
        )
    }

    /// Decode `resource` with the decoder matching its kind
    pub fn load(&self, resource: Resource) -> DecodeResult<Drawable> {
        match resource {
            Resource::Vector(id) => self.vector.decode(id).map(Drawable::from),
            Resource::Raster(id) => self.raster.load(id).map(Drawable::from),
        }
    }
}

impl fmt::Debug for ResourceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::error::DecodeError;
    use crate::raster::tests::encode_png;

    fn loader() -> ResourceLoader {
        let assets = MemoryAssets::new()
            .with_asset(1, br#"<svg width="8" height="4"/>"#.to_vec())
            .with_asset(2, encode_png(5, 5));
        ResourceLoader::from_assets(Arc::new(assets))
    }

    #[test]
    fn test_vector_dispatch() {
        let drawable = loader().load(Resource::vector(1)).unwrap();
        assert!(drawable.as_picture().is_some());
        assert_eq!(drawable.intrinsic_size(), (8.0, 4.0));
    }

    #[test]
    fn test_raster_dispatch() {
        let drawable = loader().load(Resource::raster(2)).unwrap();
        assert!(drawable.as_bitmap().is_some());
        assert_eq!(drawable.intrinsic_size(), (5.0, 5.0));
    }

    #[test]
    fn test_wrong_kind_fails() {
        // PNG bytes are not an SVG document and vice versa
        assert!(matches!(
            loader().load(Resource::vector(2)),
            Err(DecodeError::Parse { .. })
        ));
        assert!(matches!(
            loader().load(Resource::raster(1)),
            Err(DecodeError::Image { .. })
        ));
    }
}
