//! Substrate-agnostic render output
//!
//! Engines emit flat lists of styled primitives plus hit regions. A backend
//! (terminal canvas, SVG writer, GPU batcher) only has to draw polylines,
//! polygons, circles, curves, arrowheads and anchored text.
//! This module is READ-ONLY output - nothing here feeds back into engine state.

pub mod colors;
pub mod easing;

pub use colors::Color;
pub use easing::{lerp, Easing, Tween};

/// Stroke style for lines and outlines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

impl Stroke {
    pub fn new(color: Color, width: f32, opacity: f32) -> Self {
        Self {
            color,
            width,
            opacity,
        }
    }
}

/// Horizontal placement of a label relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub anchor: TextAnchor,
    pub opacity: f32,
    /// Pill background behind the text, if any
    pub background: Option<Color>,
}

impl TextStyle {
    pub fn new(color: Color, size: f32) -> Self {
        Self {
            color,
            size,
            bold: false,
            italic: false,
            anchor: TextAnchor::Middle,
            opacity: 1.0,
            background: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }
}

/// A drawable item in some coordinate space `P`
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive<P> {
    Polyline {
        points: Vec<P>,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<P>,
        fill: Color,
        fill_opacity: f32,
        stroke: Stroke,
    },
    /// Cubic Bezier from `from` to `to`
    Curve {
        from: P,
        c1: P,
        c2: P,
        to: P,
        stroke: Stroke,
    },
    /// Radius is in pixels regardless of `P`
    Circle {
        center: P,
        radius: f32,
        fill: Option<Color>,
        fill_opacity: f32,
        stroke: Option<Stroke>,
    },
    /// Triangular arrowhead; bearing in degrees, 0 = up/north, clockwise
    Arrowhead {
        tip: P,
        bearing_deg: f64,
        size: f32,
        color: Color,
    },
    /// `offset` is a pixel displacement from the anchor
    Text {
        anchor: P,
        offset: (f32, f32),
        text: String,
        style: TextStyle,
    },
}

/// A clickable region tied to an identifier
#[derive(Debug, Clone, PartialEq)]
pub enum HitShape<P> {
    Circle { center: P, radius: f32 },
    Polyline { points: Vec<P>, tolerance: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion<P, Id> {
    pub target: Id,
    pub shape: HitShape<P>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_style_builder() {
        let style = TextStyle::new(colors::WHITE, 12.0)
            .bold()
            .italic(true)
            .anchored(TextAnchor::End)
            .with_opacity(0.5);
        assert!(style.bold && style.italic);
        assert_eq!(style.anchor, TextAnchor::End);
        assert_eq!(style.opacity, 0.5);
        assert!(style.background.is_none());
    }
}
