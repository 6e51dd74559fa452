//! Vector decoder
//!
//! Parses SVG documents into [`Picture`]s. Only the document structure and
//! intrinsic geometry are resolved here.

use crate::assets::AssetSource;
use crate::drawable::{Picture, ViewBox};
use crate::error::{DecodeError, DecodeResult};
use crate::resource::VectorId;

/// Picture size used when the document declares neither size nor view box
pub const DEFAULT_PICTURE_SIZE: f32 = 512.0;

/// Turns a vector resource into a picture
pub trait VectorDecoder: Send + Sync {
    fn decode(&self, id: VectorId) -> DecodeResult<Picture>;
}

/// SVG decoder reading documents from an asset source
#[derive(Debug, Clone)]
pub struct SvgDecoder<A> {
    assets: A,
}

impl<A: AssetSource> SvgDecoder<A> {
    pub fn new(assets: A) -> Self {
        Self { assets }
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }
}

impl<A: AssetSource> VectorDecoder for SvgDecoder<A> {
    fn decode(&self, VectorId(id): VectorId) -> DecodeResult<Picture> {
        let bytes = self.assets.load(id)?.ok_or(DecodeError::NotFound(id))?;
        let text = std::str::from_utf8(&bytes).map_err(|err| DecodeError::Parse {
            id,
            reason: err.to_string(),
        })?;
        parse_picture(id, text)
    }
}

/// Parse SVG markup into a picture
///
/// The intrinsic size comes from the root `width`/`height` attributes; a
/// missing side is derived from the view box aspect ratio, and the view box
/// alone is used when neither is set. Without any of them the picture is
/// [`DEFAULT_PICTURE_SIZE`] square.
pub fn parse_picture(id: u32, markup: &str) -> DecodeResult<Picture> {
    let doc = roxmltree::Document::parse(markup).map_err(|err| DecodeError::Parse {
        id,
        reason: err.to_string(),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(DecodeError::Parse {
            id,
            reason: format!("root element is <{}>, expected <svg>", root.tag_name().name()),
        });
    }

    let width = root.attribute("width").and_then(parse_length);
    let height = root.attribute("height").and_then(parse_length);
    let view_box = root.attribute("viewBox").and_then(parse_view_box);

    let (width, height) = match (width, height, view_box) {
        (Some(w), Some(h), _) => (w, h),
        (Some(w), None, Some(vb)) => (w, w * vb.height / vb.width),
        (None, Some(h), Some(vb)) => (h * vb.width / vb.height, h),
        (None, None, Some(vb)) => (vb.width, vb.height),
        (Some(w), None, None) => (w, DEFAULT_PICTURE_SIZE),
        (None, Some(h), None) => (DEFAULT_PICTURE_SIZE, h),
        (None, None, None) => (DEFAULT_PICTURE_SIZE, DEFAULT_PICTURE_SIZE),
    };

    let element_count = doc.descendants().filter(|node| node.is_element()).count();

    Ok(Picture::new(width, height, view_box, element_count, markup))
}

/// Parse a length in user units (`12`, `12.5px`). Other units and
/// percentages are not resolvable here and yield `None`.
fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    let length = number.parse::<f32>().ok()?;
    (length.is_finite() && length > 0.0).then_some(length)
}

fn parse_view_box(value: &str) -> Option<ViewBox> {
    let numbers: Vec<f32> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    if !numbers.iter().all(|n| n.is_finite()) {
        return None;
    }

    match numbers[..] {
        [min_x, min_y, width, height] if width > 0.0 && height > 0.0 => Some(ViewBox {
            min_x,
            min_y,
            width,
            height,
        }),
        _ => None,
    }
}
