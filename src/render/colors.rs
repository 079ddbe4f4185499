//! Color definitions for languages, branches and map layers

use crate::data::LanguageStatus;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA` or `#RGB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(digits.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 17;
                }
                Some(Self::rgb8(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb8(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgb8(channel(0)?, channel(2)?, channel(4)?).with_alpha(channel(6)? as f32 / 255.0)),
            _ => None,
        }
    }

    /// Parse a dataset color, falling back to [`DEFAULT_BRANCH`] when malformed
    pub fn from_hex_or_default(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or_else(|| {
            tracing::debug!("Unparseable color '{}', using default", hex);
            DEFAULT_BRANCH
        })
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Multiply alpha by a factor (used for fades)
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: self.a * factor.clamp(0.0, 1.0),
            ..self
        }
    }

    /// 8-bit channels, for terminal and raster backends
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// Root of the tree and the homeland marker
pub const ROOT_HIGHLIGHT: Color = Color::new(212.0 / 255.0, 165.0 / 255.0, 55.0 / 255.0, 1.0);

/// Nodes whose depth-1 ancestor is not in the palette
pub const DEFAULT_BRANCH: Color = Color::new(139.0 / 255.0, 115.0 / 255.0, 85.0 / 255.0, 1.0);

/// Homeland label text
pub const HOMELAND_LABEL: Color = Color::new(139.0 / 255.0, 105.0 / 255.0, 20.0 / 255.0, 1.0);

/// Secondary label text (dates)
pub const MUTED_TEXT: Color = Color::new(85.0 / 255.0, 85.0 / 255.0, 85.0 / 255.0, 1.0);

/// Default tree label text
pub const LABEL_TEXT: Color = Color::new(232.0 / 255.0, 226.0 / 255.0, 214.0 / 255.0, 1.0);

/// Color keyed by a language's attestation status
pub fn status_color(status: LanguageStatus) -> Color {
    match status {
        LanguageStatus::Reconstructed => Color::rgb8(0x9B, 0x59, 0xB6), // Purple
        LanguageStatus::Extinct => Color::rgb8(0x95, 0xA5, 0xA6),       // Gray
        LanguageStatus::Living => Color::rgb8(0x27, 0xAE, 0x60),        // Green
        LanguageStatus::Revived => Color::rgb8(0xF3, 0x9C, 0x12),       // Amber
    }
}

/// Label color on the tree
pub fn status_label_color(status: LanguageStatus) -> Color {
    match status {
        LanguageStatus::Reconstructed => ROOT_HIGHLIGHT,
        LanguageStatus::Extinct => status_color(LanguageStatus::Extinct),
        _ => LABEL_TEXT,
    }
}

/// Palette keyed by the name of a top-level branch
pub fn branch_color(branch: &str) -> Option<Color> {
    let color = match branch {
        "Anatolian" => Color::rgb8(0x8E, 0x44, 0xAD),
        "Tocharian" => Color::rgb8(0xF3, 0x9C, 0x12),
        "Celtic" => Color::rgb8(0x2E, 0xCC, 0x71),
        "Italic" => Color::rgb8(0xE7, 0x4C, 0x3C),
        "Germanic" => Color::rgb8(0x34, 0x98, 0xDB),
        "Balto-Slavic" => Color::rgb8(0x1A, 0xBC, 0x9C),
        "Indo-Iranian" => Color::rgb8(0xE6, 0x7E, 0x22),
        "Hellenic" => Color::rgb8(0x1A, 0xBC, 0x9C),
        "Armenian" => Color::rgb8(0xD3, 0x54, 0x00),
        "Albanian" => Color::rgb8(0xC0, 0x39, 0x2B),
        _ => return None,
    };
    Some(color)
}
