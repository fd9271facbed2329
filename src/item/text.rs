use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// SVG `text-anchor` value for this alignment.
    pub fn text_anchor(&self) -> &'static str {
        match self {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_css(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

impl FontStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

/// Optional outline around the glyphs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStroke {
    /// CSS color, e.g. `#202020`.
    pub color: String,
    pub width: f32,
}

/// A styled, possibly multi-line text block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub font_size: f32,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    /// CSS color, e.g. `#333333`.
    pub color: String,
    pub text_align: TextAlign,
    /// Multiplier over `font_size`.
    pub line_height: f32,
    pub letter_spacing: f32,
    pub underline: bool,
    pub stroke: Option<TextStroke>,
}

impl TextItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 24.0,
            font_family: "sans-serif".to_owned(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            color: "#333333".to_owned(),
            text_align: TextAlign::Left,
            line_height: 1.2,
            letter_spacing: 0.0,
            underline: false,
            stroke: None,
        }
    }
}
