#![warn(clippy::all, rust_2018_idioms)]

//! An interactive product customizer: place, transform, and style text and
//! image items over a vector product template, with snapshot undo/redo and
//! SVG/PNG/JPEG/PDF export of the composed design.

pub mod app;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod item;
pub mod panels;
pub mod render;
pub mod scene;
pub mod template;

pub use app::CustomizerApp;
pub use editor::{Editor, Snapshot};
pub use error::{ExportError, TemplateError};
pub use export::{ExportArtifact, ExportFormat, compose_svg, export_scene};
pub use gesture::{DownAction, GestureCommit, GestureController, GestureTarget, HitRegion};
pub use history::History;
pub use item::{CanvasItem, Frame, ImageItem, ItemKind, MIN_ITEM_SIZE, TextItem};
pub use scene::{LayerDirection, Scene};
pub use template::{Template, TemplateRaster};
