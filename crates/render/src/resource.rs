//! Resource identifiers
//!
//! A resource is either a vector document or a platform raster asset. Each
//! kind carries its own identifier type so the loader choice is checked by
//! the compiler instead of a boolean flag. The resource itself, variant
//! included, is the cache key.

use std::fmt;

/// Identifier of a vector (SVG) resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VectorId(pub u32);

/// Identifier of a raster resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RasterId(pub u32);

/// A resource that can be decoded into a drawable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Vector(VectorId),
    Raster(RasterId),
}

impl Resource {
    /// Vector resource with the given identifier
    pub fn vector(id: u32) -> Self {
        Resource::Vector(VectorId(id))
    }

    /// Raster resource with the given identifier
    pub fn raster(id: u32) -> Self {
        Resource::Raster(RasterId(id))
    }

    /// Build from the `(source, isSvg)` attribute pair
    pub fn from_flag(id: u32, is_svg: bool) -> Self {
        if is_svg {
            Self::vector(id)
        } else {
            Self::raster(id)
        }
    }

    /// Raw identifier, without the kind
    pub fn id(&self) -> u32 {
        match self {
            Resource::Vector(VectorId(id)) | Resource::Raster(RasterId(id)) => *id,
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Resource::Vector(_))
    }
}

impl From<VectorId> for Resource {
    fn from(id: VectorId) -> Self {
        Resource::Vector(id)
    }
}

impl From<RasterId> for Resource {
    fn from(id: RasterId) -> Self {
        Resource::Raster(id)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Vector(VectorId(id)) => write!(f, "vector:{}", id),
            Resource::Raster(RasterId(id)) => write!(f, "raster:{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flag() {
        assert_eq!(Resource::from_flag(7, true), Resource::Vector(VectorId(7)));
        assert_eq!(Resource::from_flag(7, false), Resource::Raster(RasterId(7)));
    }

    #[test]
    fn test_kind_distinguishes_equal_ids() {
        use std::collections::HashSet;

        assert_eq!(Resource::vector(42).id(), Resource::raster(42).id());
        assert_ne!(Resource::vector(42), Resource::raster(42));

        let keys: HashSet<Resource> = [Resource::vector(42), Resource::raster(42)].into();
        assert_eq!(keys.len(), 2);

        assert!(Resource::vector(1).is_vector());
        assert!(!Resource::raster(1).is_vector());
    }

    #[test]
    fn test_display() {
        assert_eq!(Resource::vector(3).to_string(), "vector:3");
        assert_eq!(Resource::from(RasterId(9)).to_string(), "raster:9");
    }
}
