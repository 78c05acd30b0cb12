use serde::{Deserialize, Serialize};

/// Default font size in pixels
pub const DEFAULT_FONT_SIZE: u8 = 14;

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: u8,
}

fn default_alpha() -> u8 {
    255
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Convert to CSS hex color string
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }

    /// Parse from CSS hex color string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Parse a hex string or one of the basic CSS color keywords
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input.to_ascii_lowercase().as_str() {
            "black" => Some(Color::BLACK),
            "white" => Some(Color::WHITE),
            "red" => Some(Color::RED),
            "green" => Some(Color::GREEN),
            "blue" => Some(Color::BLUE),
            _ if input.starts_with('#') => Color::from_hex(input),
            _ => None,
        }
    }

    // Common colors
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Presentation attributes of a cell, independent of its content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default = "default_font_size")]
    pub font_size: u8,
    #[serde(default)]
    pub color: Color,
}

fn default_font_size() -> u8 {
    DEFAULT_FONT_SIZE
}

impl Default for CellFormat {
    fn default() -> Self {
        CellFormat {
            bold: false,
            italic: false,
            font_size: DEFAULT_FONT_SIZE,
            color: Color::BLACK,
        }
    }
}

/// A single formatting change applied to one cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "value", rename_all = "camelCase")]
pub enum FormatAttribute {
    Bold(bool),
    Italic(bool),
    FontSize(u8),
    Color(Color),
}

impl CellFormat {
    /// Create a new format with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Builder pattern: set italic
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Builder pattern: set font size
    pub fn with_font_size(mut self, size: u8) -> Self {
        self.font_size = size;
        self
    }

    /// Builder pattern: set text color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn apply(&mut self, attribute: FormatAttribute) {
        match attribute {
            FormatAttribute::Bold(bold) => self.bold = bold,
            FormatAttribute::Italic(italic) => self.italic = italic,
            FormatAttribute::FontSize(size) => self.font_size = size,
            FormatAttribute::Color(color) => self.color = color,
        }
    }

    /// CSS font-size value, e.g. `14px`
    pub fn font_size_css(&self) -> String {
        format!("{}px", self.font_size)
    }
}
