//! The external vector template. The markup arrives fully formed from the
//! catalog; this module only locates the root element and its view box for
//! coordinate mapping, extracts the inner markup for export composition,
//! and rasterizes the document for on-screen display.

use egui::{Vec2, vec2};
use resvg::{tiny_skia, usvg};

use crate::error::TemplateError;

#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    name: String,
    markup: String,
    /// Content of the root `<svg>` element, ready to be re-wrapped.
    inner: String,
    /// View-box origin in template units (usually 0,0).
    origin: Vec2,
    /// Intrinsic size in template units.
    intrinsic: Vec2,
}

impl Template {
    /// Reads the template geometry out of the supplied markup. Fails if
    /// the root element is not `<svg>`; everything inside the root is
    /// treated as opaque.
    pub fn from_markup(name: impl Into<String>, markup: impl Into<String>) -> Result<Self, TemplateError> {
        let markup = markup.into();
        let doc = roxmltree::Document::parse(&markup)?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(TemplateError::RootMissing);
        }

        let attr_len = |name: &str| {
            root.attribute(name)
                .and_then(|v| v.trim_end_matches("px").parse::<f32>().ok())
        };
        let mut origin = Vec2::ZERO;
        let mut intrinsic = vec2(
            attr_len("width").unwrap_or(0.0),
            attr_len("height").unwrap_or(0.0),
        );
        if let Some(view_box) = root.attribute("viewBox") {
            let parts: Vec<f32> = view_box
                .split([' ', ','])
                .filter(|s| !s.is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            if parts.len() == 4 {
                origin = vec2(parts[0], parts[1]);
                intrinsic = vec2(parts[2], parts[3]);
            }
        }
        if intrinsic.x <= 0.0 || intrinsic.y <= 0.0 {
            // No usable geometry on the root; fall back to a sane default
            // rather than rejecting the template.
            intrinsic = vec2(800.0, 600.0);
        }

        // Inner span: from the first child's start to the last child's end.
        let mut start = None;
        let mut end = None;
        for child in root.children() {
            let range = child.range();
            if start.is_none() {
                start = Some(range.start);
            }
            end = Some(range.end);
        }
        let inner = match (start, end) {
            (Some(start), Some(end)) => markup[start..end].to_owned(),
            _ => String::new(),
        };

        Ok(Self {
            name: name.into(),
            markup,
            inner,
            origin,
            intrinsic,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Markup between the root element's tags, for export composition.
    pub fn inner_markup(&self) -> &str {
        &self.inner
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn intrinsic_size(&self) -> Vec2 {
        self.intrinsic
    }

    /// Rasterizes the template at the given pixel size for on-screen
    /// display. Recomputed (debounced) whenever the canvas rect changes.
    pub fn rasterize(&self, width: u32, height: u32) -> Result<TemplateRaster, TemplateError> {
        let pixmap = rasterize_svg(&self.markup, width, height)
            .map_err(|e| match e {
                RasterizeError::Parse(msg) => TemplateError::Render(msg),
                RasterizeError::Alloc => TemplateError::SurfaceAlloc { width, height },
            })?;
        Ok(TemplateRaster {
            image: pixmap_to_color_image(&pixmap),
            outline_mask: pixmap_to_outline_mask(&pixmap),
        })
    }
}

/// On-screen raster of a template: the backdrop image plus the outline
/// mask that hides item pixels outside the template's visible silhouette.
pub struct TemplateRaster {
    pub image: egui::ColorImage,
    /// White with alpha inverted from the template's own alpha. Painted
    /// over the item layer tinted with the page background, it covers
    /// everything the template does not visibly reach.
    pub outline_mask: egui::ColorImage,
}

pub(crate) enum RasterizeError {
    Parse(String),
    Alloc,
}

/// Decodes SVG markup into an offscreen pixmap of exactly
/// `width` x `height`, scaling the document to fill it. System fonts are
/// loaded so `<text>` nodes render.
pub(crate) fn rasterize_svg(
    markup: &str,
    width: u32,
    height: u32,
) -> Result<tiny_skia::Pixmap, RasterizeError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(markup, &options)
        .map_err(|e| RasterizeError::Parse(e.to_string()))?;

    let width = width.max(1);
    let height = height.max(1);
    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(RasterizeError::Alloc)?;

    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width().max(1.0),
        height as f32 / size.height().max(1.0),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

/// tiny-skia stores premultiplied alpha; egui wants straight alpha.
pub(crate) fn pixmap_to_color_image(pixmap: &tiny_skia::Pixmap) -> egui::ColorImage {
    let mut pixels = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let a = pixel.alpha();
        if a == 0 {
            pixels.extend_from_slice(&[0, 0, 0, 0]);
        } else {
            let r = (pixel.red() as u16 * 255 / a as u16) as u8;
            let g = (pixel.green() as u16 * 255 / a as u16) as u8;
            let b = (pixel.blue() as u16 * 255 / a as u16) as u8;
            pixels.extend_from_slice(&[r, g, b, a]);
        }
    }
    egui::ColorImage::from_rgba_unmultiplied(
        [pixmap.width() as usize, pixmap.height() as usize],
        &pixels,
    )
}

/// Inverse-alpha silhouette of the template. Anti-aliased edge pixels get
/// a partial cover, so the mask edge stays smooth.
pub(crate) fn pixmap_to_outline_mask(pixmap: &tiny_skia::Pixmap) -> egui::ColorImage {
    let mut pixels = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        pixels.extend_from_slice(&[255, 255, 255, 255 - pixel.alpha()]);
    }
    egui::ColorImage::from_rgba_unmultiplied(
        [pixmap.width() as usize, pixmap.height() as usize],
        &pixels,
    )
}
