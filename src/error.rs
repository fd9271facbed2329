use thiserror::Error;

/// Errors raised while reading or rasterizing the external template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The supplied markup has no `<svg>` root element.
    #[error("template root element not found")]
    RootMissing,
    /// The markup is not well-formed XML.
    #[error("template markup is not valid XML: {0}")]
    Parse(#[from] roxmltree::Error),
    /// resvg could not build a render tree from the markup.
    #[error("template could not be rendered: {0}")]
    Render(String),
    /// The requested raster surface could not be allocated.
    #[error("cannot allocate a {width}x{height} raster surface")]
    SurfaceAlloc { width: u32, height: u32 },
}

/// Errors raised by the export pipeline. Any failure aborts the whole
/// export; no partial file is ever produced.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// An image item's source bytes failed to decode while inlining.
    #[error("image item {id} failed to decode: {source}")]
    ImageDecode {
        id: String,
        #[source]
        source: image::ImageError,
    },
    /// The composed SVG was rejected by the rasterizer.
    #[error("composed SVG failed to parse: {0}")]
    ComposedSvg(String),
    /// Encoding the pixel buffer to the target format failed.
    #[error("failed to encode {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
    /// No template has been assigned to the editor yet.
    #[error("no template loaded")]
    NoTemplate,
}
