//! Styleable attributes read once when a view is constructed

use svg_view_render::Resource;

/// Attribute naming the initial resource
pub const ATTR_SOURCE: &str = "source";
/// Attribute flagging the initial resource as SVG
pub const ATTR_IS_SVG: &str = "isSvg";

/// Sentinel meaning "no resource"
pub const NO_RESOURCE: i64 = -1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("invalid resource reference for `source`: {0}")]
    InvalidSource(String),
    #[error("invalid boolean for `isSvg`: {0}")]
    InvalidFlag(String),
}

/// The `source` / `isSvg` attribute pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewAttributes {
    pub source: Option<u32>,
    pub is_svg: bool,
}

impl ViewAttributes {
    pub fn new(source: u32, is_svg: bool) -> Self {
        Self {
            source: Some(source),
            is_svg,
        }
    }

    /// Initial resource to load, if any
    pub fn resource(&self) -> Option<Resource> {
        self.source.map(|id| Resource::from_flag(id, self.is_svg))
    }

    /// Parse raw attribute pairs. Unknown attributes are ignored.
    ///
    /// `source` accepts a resource id with an optional `@` prefix, or `-1`
    /// for none. `isSvg` accepts `true` or `false`.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, AttributeError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut attributes = Self::default();

        for (name, value) in pairs {
            match name {
                ATTR_SOURCE => attributes.source = parse_source(value)?,
                ATTR_IS_SVG => {
                    attributes.is_svg = value
                        .trim()
                        .parse::<bool>()
                        .map_err(|_| AttributeError::InvalidFlag(value.to_string()))?;
                }
                _ => {}
            }
        }

        Ok(attributes)
    }
}

fn parse_source(value: &str) -> Result<Option<u32>, AttributeError> {
    let trimmed = value.trim();
    let number = trimmed.strip_prefix('@').unwrap_or(trimmed);
    let id = number
        .parse::<i64>()
        .map_err(|_| AttributeError::InvalidSource(value.to_string()))?;

    if id == NO_RESOURCE {
        return Ok(None);
    }
    u32::try_from(id)
        .map(Some)
        .map_err(|_| AttributeError::InvalidSource(value.to_string()))
}
