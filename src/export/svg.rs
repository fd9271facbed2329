//! Compose the scene into self-contained SVG markup: the template's own
//! content re-wrapped with explicit dimensions, followed by one element
//! per item in ascending paint order. Image sources are inlined as data
//! URIs so the exported file has no external references.

use std::fmt::Write as _;
use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::error::ExportError;
use crate::item::{CanvasItem, ImageItem, ItemKind, TextItem};
use crate::template::Template;

pub fn compose_svg(
    template: &Template,
    items: &[CanvasItem],
    export_size: Option<(u32, u32)>,
) -> Result<String, ExportError> {
    let intrinsic = template.intrinsic_size();
    let origin = template.origin();
    // Configured export dimensions win; otherwise the template's own size.
    let (width, height) = export_size
        .unwrap_or((intrinsic.x.ceil() as u32, intrinsic.y.ceil() as u32));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">",
        width, height, origin.x, origin.y, intrinsic.x, intrinsic.y
    );
    out.push_str(template.inner_markup());
    out.push('\n');

    let mut ordered: Vec<&CanvasItem> = items.iter().collect();
    ordered.sort_by_key(|item| item.z_index);
    for item in ordered {
        match &item.kind {
            ItemKind::Image(image) => write_image(&mut out, item, image, origin)?,
            ItemKind::Text(text) => write_text(&mut out, item, text, origin),
        }
    }

    out.push_str("</svg>\n");
    Ok(out)
}

/// Rotation attribute around the item's own center, in view-box units.
fn rotate_attr(item: &CanvasItem, origin: egui::Vec2) -> String {
    if item.frame.rotation == 0.0 {
        return String::new();
    }
    let center = item.frame.center();
    format!(
        " transform=\"rotate({} {} {})\"",
        item.frame.rotation,
        center.x + origin.x,
        center.y + origin.y
    )
}

fn write_image(
    out: &mut String,
    item: &CanvasItem,
    image: &ImageItem,
    origin: egui::Vec2,
) -> Result<(), ExportError> {
    // A source that fails to decode fails the whole export; a silently
    // partial file would be worse than no file.
    let data_uri = inline_data_uri(&item.id, &image.bytes)?;
    let frame = &item.frame;
    let _ = writeln!(
        out,
        "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" opacity=\"{}\" preserveAspectRatio=\"xMidYMid meet\"{} xlink:href=\"{}\"/>",
        frame.x + origin.x,
        frame.y + origin.y,
        frame.width,
        frame.height,
        image.opacity,
        rotate_attr(item, origin),
        data_uri
    );
    Ok(())
}

/// Decodes the source bytes and re-encodes them as a PNG data URI, so the
/// output never depends on the original container format.
fn inline_data_uri(id: &str, bytes: &[u8]) -> Result<String, ExportError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| ExportError::ImageDecode {
        id: id.to_owned(),
        source,
    })?;
    let mut png = Cursor::new(Vec::new());
    decoded
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|source| ExportError::ImageDecode {
            id: id.to_owned(),
            source,
        })?;
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png.into_inner())
    ))
}

fn write_text(out: &mut String, item: &CanvasItem, text: &TextItem, origin: egui::Vec2) {
    let frame = &item.frame;
    // Horizontal anchor follows the alignment; vertical placement is
    // top-anchored (hanging baseline) to match the editor's top-left
    // frame semantics.
    let anchor_x = origin.x
        + match text.text_align {
            crate::item::TextAlign::Left => frame.x,
            crate::item::TextAlign::Center => frame.x + frame.width / 2.0,
            crate::item::TextAlign::Right => frame.x + frame.width,
        };

    let mut style = format!(
        "font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" font-style=\"{}\" fill=\"{}\" text-anchor=\"{}\" dominant-baseline=\"hanging\"",
        escape_xml(&text.font_family),
        text.font_size,
        text.font_weight.as_css(),
        text.font_style.as_css(),
        escape_xml(&text.color),
        text.text_align.text_anchor(),
    );
    if text.letter_spacing != 0.0 {
        let _ = write!(style, " letter-spacing=\"{}\"", text.letter_spacing);
    }
    if text.underline {
        style.push_str(" text-decoration=\"underline\"");
    }
    if let Some(stroke) = &text.stroke {
        let _ = write!(
            style,
            " stroke=\"{}\" stroke-width=\"{}\"",
            escape_xml(&stroke.color),
            stroke.width
        );
    }

    let _ = write!(out, "<text {}{}>", style, rotate_attr(item, origin));
    let line_step = text.font_size * text.line_height;
    for (index, line) in text.text.lines().enumerate() {
        let _ = write!(
            out,
            "<tspan x=\"{}\" y=\"{}\">{}</tspan>",
            anchor_x,
            frame.y + origin.y + index as f32 * line_step,
            escape_xml(line)
        );
    }
    out.push_str("</text>\n");
}

pub(crate) fn escape_xml(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => s.push_str("&amp;"),
            '<' => s.push_str("&lt;"),
            '>' => s.push_str("&gt;"),
            '"' => s.push_str("&quot;"),
            '\'' => s.push_str("&apos;"),
            _ => s.push(ch),
        }
    }
    s
}
