//! Multi-format export pipeline. Reads a snapshot of the scene plus the
//! template geometry and produces one downloadable artifact; editor state
//! is never touched. Any failure aborts the whole export.

mod pdf;
mod raster;
mod svg;

pub use svg::compose_svg;

use log::info;

use crate::error::ExportError;
use crate::item::CanvasItem;
use crate::template::Template;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// One finished export: `canvas.<ext>` plus its bytes. Writing it to disk
/// (or a print spool) is the host's business.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Exports the composed scene. `export_size` overrides the template's
/// intrinsic dimensions for the output; `None` keeps them.
pub fn export_scene(
    template: &Template,
    items: &[CanvasItem],
    export_size: Option<(u32, u32)>,
    format: ExportFormat,
) -> Result<ExportArtifact, ExportError> {
    let intrinsic = template.intrinsic_size();
    let (width, height) =
        export_size.unwrap_or((intrinsic.x.ceil() as u32, intrinsic.y.ceil() as u32));

    let markup = compose_svg(template, items, export_size)?;
    let bytes = match format {
        ExportFormat::Svg => markup.into_bytes(),
        ExportFormat::Png => {
            let pixmap = raster::render_pixmap(&markup, width, height)?;
            raster::encode_png(&pixmap)?
        }
        ExportFormat::Jpeg => {
            let pixmap = raster::render_pixmap(&markup, width, height)?;
            raster::encode_jpeg(&pixmap)?
        }
        ExportFormat::Pdf => {
            let pixmap = raster::render_pixmap(&markup, width, height)?;
            pdf::wrap_jpeg(&raster::encode_jpeg(&pixmap)?, width, height)
        }
    };

    let artifact = ExportArtifact {
        filename: format!("canvas.{}", format.extension()),
        bytes,
    };
    info!(
        "export: {} ({} items, {}x{}, {} bytes)",
        artifact.filename,
        items.len(),
        width,
        height,
        artifact.bytes.len()
    );
    Ok(artifact)
}
