//! Buffer ownership seam between the cache and the surface it feeds.

/// Something that may hold an exclusively owned raster buffer on behalf of a
/// display surface.
pub trait BufferOwner {
    /// Drop the currently bound raster buffer, if any.
    ///
    /// Returns the number of bytes freed, or `None` when nothing was freed:
    /// either nothing was bound, or the buffer is still shared with another
    /// holder and only this binding was dropped. After this returns the
    /// surface no longer reads the buffer.
    fn release_bound_buffer(&mut self) -> Option<usize>;
}

/// A surface with nothing bound. Useful for clearing a cache that is not
/// attached to any surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl BufferOwner for Detached {
    fn release_bound_buffer(&mut self) -> Option<usize> {
        None
    }
}
