//! Image view backed by the shared drawable cache
//!
//! Every request consults the cache first. On a miss the resource is decoded
//! outside the cache lock, stored, and bound to the surface. Two concurrent
//! misses on the same key may both decode; the later insert wins.

use std::sync::Arc;

use svg_view_cache::ResourceCache;
use svg_view_render::{DecodeResult, Drawable, Resource, ResourceLoader};
use tracing::{debug, warn};

use crate::attributes::ViewAttributes;
use crate::surface::DisplaySurface;

/// Cache of decoded drawables shared by views, keyed by resource kind and id
pub type DrawableCache = ResourceCache<Resource, Drawable>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Image,
    Background,
}

/// A view displaying SVG or raster resources through the drawable cache
#[derive(Debug)]
pub struct SvgView<S> {
    cache: Arc<DrawableCache>,
    loader: ResourceLoader,
    surface: S,
}

impl<S: DisplaySurface> SvgView<S> {
    pub fn new(cache: Arc<DrawableCache>, loader: ResourceLoader, surface: S) -> Self {
        Self {
            cache,
            loader,
            surface,
        }
    }

    /// Create the view and load the resource named by its attributes
    pub fn with_attributes(
        cache: Arc<DrawableCache>,
        loader: ResourceLoader,
        surface: S,
        attributes: &ViewAttributes,
    ) -> Self {
        let mut view = Self::new(cache, loader, surface);
        if let Some(resource) = attributes.resource() {
            view.set_cached_image_drawable(resource);
        }
        view
    }

    /// Bind `resource` as the foreground content, decoding it on a miss
    ///
    /// Returns `None` if the resource could not be decoded; the surface
    /// keeps whatever it showed before.
    pub fn set_cached_image_drawable(&mut self, resource: Resource) -> Option<Drawable> {
        self.bind(resource, Slot::Image)
    }

    /// Bind `resource` as the background, decoding it on a miss
    pub fn set_cached_background_drawable(&mut self, resource: Resource) -> Option<Drawable> {
        self.bind(resource, Slot::Background)
    }

    fn bind(&mut self, resource: Resource, slot: Slot) -> Option<Drawable> {
        let drawable = match self.cache.get(&resource) {
            Some(drawable) => {
                debug!(%resource, ?slot, "drawable cache hit");
                drawable
            }
            None => match load_into(&self.cache, &self.loader, resource) {
                Ok(drawable) => drawable,
                Err(err) => {
                    warn!(%resource, error = %err, "no drawable available");
                    return None;
                }
            },
        };

        match slot {
            Slot::Image => self.surface.set_image(drawable.clone()),
            Slot::Background => self.surface.set_background(drawable.clone()),
        }
        Some(drawable)
    }

    /// Empty the cache and release the bitmap bound to this view's surface
    ///
    /// Returns the number of bytes the surface released.
    pub fn clear_memory_garbage(&mut self) -> Option<usize> {
        self.cache.evict_all(&mut self.surface)
    }

    pub fn cache(&self) -> &Arc<DrawableCache> {
        &self.cache
    }

    pub fn loader(&self) -> &ResourceLoader {
        &self.loader
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Decode `resource` into the cache ahead of time
///
/// Intended for background workers. Does nothing if the resource is already
/// cached; does not change its recency in that case.
pub fn prefetch(
    cache: &DrawableCache,
    loader: &ResourceLoader,
    resource: Resource,
) -> DecodeResult<Drawable> {
    match cache.peek(&resource) {
        Some(drawable) => Ok(drawable),
        None => load_into(cache, loader, resource),
    }
}

fn load_into(
    cache: &DrawableCache,
    loader: &ResourceLoader,
    resource: Resource,
) -> DecodeResult<Drawable> {
    let drawable = loader.load(resource)?;
    let evicted = cache.put_weighed(resource, drawable.clone());
    debug!(
        %resource,
        evicted = evicted.len(),
        total_cost = cache.total_cost(),
        "decoded and cached drawable"
    );
    Ok(drawable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::ImageSurface;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use svg_view_cache::CostModel;
    use svg_view_render::{
        Bitmap, DecodeError, Picture, RasterId, RasterLoader, VectorDecoder, VectorId,
    };

    /// Decoder that counts calls and fails for odd ids
    #[derive(Default)]
    struct CountingDecoder {
        calls: AtomicUsize,
    }

    impl VectorDecoder for CountingDecoder {
        fn decode(&self, VectorId(id): VectorId) -> DecodeResult<Picture> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id % 2 == 1 {
                return Err(DecodeError::Parse {
                    id,
                    reason: "odd".to_string(),
                });
            }
            Ok(Picture::new(16.0, 16.0, None, 1, "<svg/>"))
        }
    }

    #[derive(Default)]
    struct CountingRaster {
        calls: AtomicUsize,
    }

    impl RasterLoader for CountingRaster {
        fn load(&self, RasterId(id): RasterId) -> DecodeResult<Bitmap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id == 0 {
                return Err(DecodeError::NotFound(id));
            }
            Bitmap::new(16, 16, vec![0; 16 * 16 * 4]).ok_or(DecodeError::NotFound(id))
        }
    }

    struct Fixture {
        vector: Arc<CountingDecoder>,
        raster: Arc<CountingRaster>,
        view: SvgView<ImageSurface>,
    }

    fn fixture(capacity: usize) -> Fixture {
        let vector = Arc::new(CountingDecoder::default());
        let raster = Arc::new(CountingRaster::default());
        let loader = ResourceLoader::new(vector.clone(), raster.clone());
        let cache = Arc::new(DrawableCache::with_cost_model(capacity, CostModel::Unit));
        Fixture {
            vector,
            raster,
            view: SvgView::new(cache, loader, ImageSurface::new()),
        }
    }

    #[test]
    fn test_miss_then_hit() {
        let mut f = fixture(10);

        let first = f.view.set_cached_image_drawable(Resource::vector(2)).unwrap();
        let second = f.view.set_cached_image_drawable(Resource::vector(2)).unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(f.vector.calls.load(Ordering::SeqCst), 1);
        assert!(f.view.surface().image().unwrap().ptr_eq(&first));
        assert_eq!(f.view.cache().stats().hits, 1);
    }

    #[test]
    fn test_background_uses_same_cache() {
        let mut f = fixture(10);

        let image = f.view.set_cached_image_drawable(Resource::raster(4)).unwrap();
        let background = f
            .view
            .set_cached_background_drawable(Resource::raster(4))
            .unwrap();

        assert!(image.ptr_eq(&background));
        assert!(f.view.surface().background().unwrap().ptr_eq(&image));
        assert_eq!(f.raster.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_decode_failure_is_not_cached() {
        let mut f = fixture(10);

        let shown = f.view.set_cached_image_drawable(Resource::vector(2)).unwrap();
        assert!(f.view.set_cached_image_drawable(Resource::vector(3)).is_none());
        assert!(f.view.set_cached_image_drawable(Resource::vector(3)).is_none());

        // Each failing request decodes again
        assert_eq!(f.vector.calls.load(Ordering::SeqCst), 3);
        assert!(!f.view.cache().contains(&Resource::vector(3)));
        // The previous drawable stays bound
        assert!(f.view.surface().image().unwrap().ptr_eq(&shown));
    }

    #[test]
    fn test_missing_raster_yields_none() {
        let mut f = fixture(10);
        assert!(f.view.set_cached_background_drawable(Resource::raster(0)).is_none());
        assert!(f.view.surface().background().is_none());
    }

    #[test]
    fn test_zero_capacity_still_binds() {
        let mut f = fixture(0);

        assert!(f.view.set_cached_image_drawable(Resource::raster(1)).is_some());
        assert!(f.view.surface().image().is_some());
        assert!(f.view.cache().is_empty());

        f.view.set_cached_image_drawable(Resource::raster(1));
        assert_eq!(f.raster.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_with_attributes_loads_initial_resource() {
        let vector = Arc::new(CountingDecoder::default());
        let raster = Arc::new(CountingRaster::default());
        let loader = ResourceLoader::new(vector.clone(), raster.clone());
        let cache = Arc::new(DrawableCache::new(100));

        let view = SvgView::with_attributes(
            cache.clone(),
            loader.clone(),
            ImageSurface::new(),
            &ViewAttributes::new(6, true),
        );
        assert!(view.surface().image().unwrap().as_picture().is_some());
        assert!(cache.contains(&Resource::vector(6)));
        assert!(!cache.contains(&Resource::raster(6)));

        let empty = SvgView::with_attributes(
            cache,
            loader,
            ImageSurface::new(),
            &ViewAttributes::default(),
        );
        assert!(empty.surface().image().is_none());
        assert_eq!(vector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(raster.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_same_id_different_kind_is_separate_entry() {
        let mut f = fixture(10);

        let bitmap = f.view.set_cached_image_drawable(Resource::raster(2)).unwrap();
        let picture = f.view.set_cached_image_drawable(Resource::vector(2)).unwrap();

        assert!(bitmap.as_bitmap().is_some());
        assert!(picture.as_picture().is_some());
        assert_eq!(f.raster.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.vector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.view.cache().len(), 2);

        // Both are now hits, each of its own kind
        let cached = f.view.set_cached_background_drawable(Resource::raster(2)).unwrap();
        assert!(cached.ptr_eq(&bitmap));
        assert_eq!(f.raster.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_memory_garbage() {
        let mut f = fixture(10);
        f.view.set_cached_image_drawable(Resource::raster(1));
        f.view.set_cached_background_drawable(Resource::vector(2));

        assert_eq!(f.view.clear_memory_garbage(), Some(16 * 16 * 4));
        assert!(f.view.cache().is_empty());
        assert_eq!(f.view.cache().total_cost(), 0);
        assert!(f.view.surface().image().is_none());
        // Background pictures are not raster buffers
        assert!(f.view.surface().background().is_some());

        // Nothing bound any more
        assert_eq!(f.view.clear_memory_garbage(), None);
    }

    #[test]
    fn test_prefetch() {
        let f = fixture(10);
        let cache = f.view.cache();

        let decoded = prefetch(cache, f.view.loader(), Resource::raster(1)).unwrap();
        let again = prefetch(cache, f.view.loader(), Resource::raster(1)).unwrap();

        assert!(decoded.ptr_eq(&again));
        assert_eq!(f.raster.calls.load(Ordering::SeqCst), 1);
        assert!(prefetch(cache, f.view.loader(), Resource::vector(1)).is_err());
    }
}
