//! Text metrics: the tight pixel bounding box of a rendered string.

use crate::font::Face;

/// Pixel bounds of a string relative to its baseline origin.
///
/// `min_y` is negative for glyphs rising above the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    /// Leftmost covered column.
    pub min_x: i32,
    /// Topmost covered row.
    pub min_y: i32,
    /// One past the rightmost covered column.
    pub max_x: i32,
    /// One past the bottom covered row.
    pub max_y: i32,
}

impl TextBounds {
    /// Width of the box in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.max_x.abs_diff(self.min_x)
    }

    /// Height of the box in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.max_y.abs_diff(self.min_y)
    }

    /// Whether nothing would be drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// Union of the glyph boxes of `text`, laid out at baseline origin `(0, 0)`.
///
/// Whitespace-only text yields an empty box at the origin.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn bounds(face: &Face<'_>, text: &str) -> TextBounds {
    face.outline(text, 0.0, 0.0)
        .iter()
        .map(|glyph| {
            let r = glyph.px_bounds();
            TextBounds {
                min_x: r.min.x as i32,
                min_y: r.min.y as i32,
                max_x: r.max.x as i32,
                max_y: r.max.y as i32,
            }
        })
        .reduce(TextBounds::union)
        .unwrap_or_default()
}

/// Measure `text` as `(width, height)` in pixels.
#[must_use]
pub fn measure(face: &Face<'_>, text: &str) -> (u32, u32) {
    let b = bounds(face, text);
    (b.width(), b.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::EMBEDDED_FONT;

    fn face(size: f32) -> Face<'static> {
        Face::load(EMBEDDED_FONT, size, 100.0).unwrap()
    }

    #[test]
    fn measure_is_tight_not_line_height() {
        let f = face(40.0);
        let (_, h_caps) = measure(&f, "HH");
        let (_, h_mixed) = measure(&f, "Hg");
        // descender adds height below the baseline
        assert!(h_mixed > h_caps);
        assert!(bounds(&f, "HH").max_y <= 1);
    }

    #[test]
    fn longer_text_is_wider() {
        let f = face(40.0);
        let (w1, _) = measure(&f, "A");
        let (w2, _) = measure(&f, "AAAA");
        assert!(w2 > 3 * w1);
    }

    #[test]
    fn size_scales_dimensions() {
        let (w1, h1) = measure(&face(20.0), "Hello");
        let (w2, h2) = measure(&face(40.0), "Hello");
        assert!(w2 > w1);
        assert!(h2 > h1);
    }

    #[test]
    fn glyphs_rise_above_baseline() {
        let b = bounds(&face(40.0), "A");
        assert!(b.min_y < 0);
        assert!(!b.is_empty());
    }

    #[test]
    fn whitespace_measures_empty() {
        let b = bounds(&face(40.0), "   ");
        assert_eq!(b, TextBounds::default());
        assert!(b.is_empty());
        assert_eq!(measure(&face(40.0), ""), (0, 0));
    }
}
