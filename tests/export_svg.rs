use std::io::Cursor;

use customizer_canvas::export::{ExportFormat, compose_svg, export_scene};
use customizer_canvas::item::{Frame, ImageItem, TextAlign, TextItem};
use customizer_canvas::scene::{LayerDirection, Scene};
use customizer_canvas::template::Template;
use customizer_canvas::error::{ExportError, TemplateError};

const TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 300">
<rect x="0" y="0" width="400" height="300" fill="#eeeeee"/>
</svg>"##;

fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn template() -> Template {
    Template::from_markup("test", TEMPLATE).unwrap()
}

#[test]
fn template_rejects_non_svg_root() {
    let err = Template::from_markup("bad", "<div><p/></div>").unwrap_err();
    assert!(matches!(err, TemplateError::RootMissing));
}

#[test]
fn template_reads_viewbox_geometry() {
    let t = template();
    assert_eq!(t.intrinsic_size(), egui::vec2(400.0, 300.0));
    assert_eq!(t.origin(), egui::Vec2::ZERO);
    assert!(t.inner_markup().contains("<rect"));
}

#[test]
fn outline_mask_inverts_template_alpha() {
    // Template paints only the left half; the mask must cover the right.
    let markup = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
<rect x="0" y="0" width="50" height="100" fill="#000000"/>
</svg>"##;
    let t = Template::from_markup("half", markup).unwrap();
    let raster = t.rasterize(100, 100).unwrap();

    let at = |img: &egui::ColorImage, x: usize, y: usize| img.pixels[y * 100 + x];
    assert_eq!(at(&raster.image, 25, 50).a(), 255);
    assert_eq!(at(&raster.image, 75, 50).a(), 0);
    // Transparent where the template paints, opaque where it does not.
    assert_eq!(at(&raster.outline_mask, 25, 50).a(), 0);
    assert_eq!(at(&raster.outline_mask, 75, 50).a(), 255);
}

#[test]
fn composed_svg_stamps_dimensions_and_template_content() {
    let scene = Scene::new();
    let markup = compose_svg(&template(), scene.items(), None).unwrap();
    assert!(markup.starts_with("<svg "));
    assert!(markup.contains("width=\"400\" height=\"300\""));
    assert!(markup.contains("viewBox=\"0 0 400 300\""));
    assert!(markup.contains("fill=\"#eeeeee\""));
    assert!(markup.trim_end().ends_with("</svg>"));
}

#[test]
fn export_size_overrides_dimensions() {
    let scene = Scene::new();
    let markup = compose_svg(&template(), scene.items(), Some((800, 600))).unwrap();
    assert!(markup.contains("width=\"800\" height=\"600\""));
    // The view box keeps template units, so content scales up.
    assert!(markup.contains("viewBox=\"0 0 400 300\""));
}

#[test]
fn items_are_written_in_ascending_paint_order() {
    let mut scene = Scene::new();
    scene.add_image(Frame::new(10.0, 10.0, 100.0, 100.0), ImageItem::new(tiny_png(), 4, 4));
    let text_id = scene.add_text(Frame::new(50.0, 50.0, 200.0, 60.0), TextItem::new("Hi"));

    let markup = compose_svg(&template(), scene.items(), None).unwrap();
    let image_at = markup.find("<image ").unwrap();
    let text_at = markup.find("<text ").unwrap();
    assert!(image_at < text_at);

    // Send the text to the back; document order must flip.
    scene.move_layer(&text_id, LayerDirection::Back);
    let markup = compose_svg(&template(), scene.items(), None).unwrap();
    assert!(markup.find("<text ").unwrap() < markup.find("<image ").unwrap());
}

#[test]
fn build_and_export_a_simple_design() {
    let mut scene = Scene::new();
    let text_id = scene.add_text(Frame::new(80.0, 80.0, 260.0, 60.0), TextItem::new("Hi"));
    assert_eq!(scene.item(&text_id).unwrap().z_index, 1);
    assert_eq!(scene.selected_id(), Some(text_id.as_str()));

    let image_id = scene.add_image(Frame::new(10.0, 10.0, 100.0, 100.0), ImageItem::new(tiny_png(), 4, 4));
    assert_eq!(scene.item(&image_id).unwrap().z_index, 2);
    assert_eq!(scene.selected_id(), Some(image_id.as_str()));

    scene.bring_to_front(&text_id);
    assert_eq!(scene.item(&text_id).unwrap().z_index, 3);

    // The image (z=2) paints before the text (z=3) in the document.
    let markup = compose_svg(&template(), scene.items(), None).unwrap();
    assert_eq!(markup.matches("<text ").count(), 1);
    assert_eq!(markup.matches("<image ").count(), 1);
    assert!(markup.contains(">Hi</tspan>"));
    assert!(markup.find("<image ").unwrap() < markup.find("<text ").unwrap());
}

#[test]
fn image_sources_are_inlined_as_data_uris() {
    let mut scene = Scene::new();
    scene.add_image(Frame::new(10.0, 10.0, 100.0, 100.0), ImageItem::new(tiny_png(), 4, 4));

    let markup = compose_svg(&template(), scene.items(), None).unwrap();
    assert!(markup.contains("xlink:href=\"data:image/png;base64,"));
    assert!(!markup.contains("http://example"));
}

#[test]
fn undecodable_image_fails_the_whole_export() {
    let mut scene = Scene::new();
    let id = scene.add_image(
        Frame::new(0.0, 0.0, 100.0, 100.0),
        ImageItem::new(b"not an image".to_vec(), 4, 4),
    );

    let err = compose_svg(&template(), scene.items(), None).unwrap_err();
    match err {
        ExportError::ImageDecode { id: failed, .. } => assert_eq!(failed, id),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn text_styling_lands_in_attributes() {
    let mut scene = Scene::new();
    let id = scene.add_text(Frame::new(20.0, 30.0, 200.0, 80.0), TextItem::new("one\ntwo"));
    scene.update_item(&id, |item| {
        if let customizer_canvas::item::ItemKind::Text(text) = &mut item.kind {
            text.text_align = TextAlign::Center;
            text.underline = true;
            text.font_size = 20.0;
            text.line_height = 1.5;
        }
    });

    let markup = compose_svg(&template(), scene.items(), None).unwrap();
    assert!(markup.contains("text-anchor=\"middle\""));
    assert!(markup.contains("text-decoration=\"underline\""));
    assert!(markup.contains("dominant-baseline=\"hanging\""));
    // Two lines: anchored at the frame center x, stepped by size*line-height.
    assert!(markup.contains("<tspan x=\"120\" y=\"30\">one</tspan>"));
    assert!(markup.contains("<tspan x=\"120\" y=\"60\">two</tspan>"));
}

#[test]
fn text_content_is_xml_escaped() {
    let mut scene = Scene::new();
    scene.add_text(Frame::new(0.0, 0.0, 100.0, 50.0), TextItem::new("<Hi & Bye>"));

    let markup = compose_svg(&template(), scene.items(), None).unwrap();
    assert!(markup.contains("&lt;Hi &amp; Bye&gt;"));
    assert!(!markup.contains("<Hi"));
}

#[test]
fn rotation_becomes_a_transform_around_the_center() {
    let mut scene = Scene::new();
    let id = scene.add_text(Frame::new(0.0, 0.0, 100.0, 50.0), TextItem::new("spin"));
    scene.rotate_item(&id, 45.0);

    let markup = compose_svg(&template(), scene.items(), None).unwrap();
    assert!(markup.contains("transform=\"rotate(45 50 25)\""));
}

#[test]
fn export_scene_produces_named_artifacts() {
    let mut scene = Scene::new();
    scene.add_text(Frame::new(20.0, 20.0, 200.0, 60.0), TextItem::new("Hi"));
    scene.add_image(Frame::new(100.0, 100.0, 80.0, 80.0), ImageItem::new(tiny_png(), 4, 4));

    let svg = export_scene(&template(), scene.items(), None, ExportFormat::Svg).unwrap();
    assert_eq!(svg.filename, "canvas.svg");
    assert!(String::from_utf8(svg.bytes).unwrap().contains("<text "));

    let png = export_scene(&template(), scene.items(), None, ExportFormat::Png).unwrap();
    assert_eq!(png.filename, "canvas.png");
    assert_eq!(&png.bytes[..4], &[0x89, b'P', b'N', b'G']);

    let jpeg = export_scene(&template(), scene.items(), None, ExportFormat::Jpeg).unwrap();
    assert_eq!(jpeg.filename, "canvas.jpg");
    assert_eq!(&jpeg.bytes[..2], &[0xFF, 0xD8]);

    let pdf = export_scene(&template(), scene.items(), None, ExportFormat::Pdf).unwrap();
    assert_eq!(pdf.filename, "canvas.pdf");
    assert!(pdf.bytes.starts_with(b"%PDF-1.4"));
    assert!(pdf.bytes.ends_with(b"%%EOF\n"));
}

#[test]
fn raster_export_honors_export_size() {
    let scene = Scene::new();
    let artifact =
        export_scene(&template(), scene.items(), Some((200, 150)), ExportFormat::Png).unwrap();
    let decoded = image::load_from_memory(&artifact.bytes).unwrap().to_rgba8();
    assert_eq!((decoded.width(), decoded.height()), (200, 150));
}
