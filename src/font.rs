//! Font face provider.
//!
//! A [`Face`] binds an outline font to one (size, dpi) pair. Faces are
//! cheap to build and are created fresh for every render call; the font
//! bytes they borrow live for the whole process.

use ab_glyph::{point, Font, FontRef, Glyph, GlyphId, OutlinedGlyph, PxScale, ScaleFont};

use crate::error::Result;

/// The embedded default font (DejaVu Sans, Bitstream Vera license).
pub static EMBEDDED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// An outline font scaled for rasterization at a given size and resolution.
#[derive(Clone)]
pub struct Face<'f> {
    font: FontRef<'f>,
    scale: PxScale,
}

impl std::fmt::Debug for Face<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Face")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl<'f> Face<'f> {
    /// Parse `data` and scale it to `size` points at `dpi` dots per inch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FontLoad`](crate::Error::FontLoad) if the font data
    /// cannot be parsed.
    pub fn load(data: &'f [u8], size: f32, dpi: f32) -> Result<Self> {
        let font = FontRef::try_from_slice(data)?;

        // ab_glyph scales by ascent-to-descent height, not by em size.
        let px_per_em = size * dpi / POINTS_PER_INCH;
        let scale = match font.units_per_em() {
            Some(upem) => PxScale::from(px_per_em * font.height_unscaled() / upem),
            None => PxScale::from(px_per_em),
        };
        log::debug!("face loaded: {size}pt @ {dpi}dpi -> {px_per_em:.2}px/em");

        Ok(Self { font, scale })
    }

    /// The pixel scale glyphs are rasterized at.
    #[must_use]
    pub fn scale(&self) -> PxScale {
        self.scale
    }

    /// Lay out `text` left to right with its baseline origin at `(x, y)`.
    ///
    /// Kerning is applied between adjacent glyphs; no shaping is done.
    pub(crate) fn layout(&self, text: &str, x: f32, y: f32) -> Vec<Glyph> {
        let scaled = self.font.as_scaled(self.scale);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut caret = x;
        let mut prev: Option<GlyphId> = None;

        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(self.scale, point(caret, y)));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }

        glyphs
    }

    /// Outline every visible glyph of `text` laid out at baseline origin `(x, y)`.
    ///
    /// Glyphs without an outline (spaces) are dropped.
    pub(crate) fn outline(&self, text: &str, x: f32, y: f32) -> Vec<OutlinedGlyph> {
        self.layout(text, x, y)
            .into_iter()
            .filter_map(|g| self.font.outline_glyph(g))
            .collect()
    }

    /// Rasterize `text` as a coverage mask with its baseline origin at `(x, y)`.
    ///
    /// `plot` receives absolute pixel coordinates and a coverage in `(0, 1]`;
    /// zero-coverage pixels are never reported.
    pub fn rasterize(&self, text: &str, x: i32, y: i32, mut plot: impl FnMut(i32, i32, f32)) {
        #[allow(clippy::cast_precision_loss)]
        let glyphs = self.outline(text, x as f32, y as f32);

        for glyph in glyphs {
            let bounds = glyph.px_bounds();
            #[allow(clippy::cast_possible_truncation)]
            let (min_x, min_y) = (bounds.min.x as i32, bounds.min.y as i32);
            glyph.draw(|gx, gy, coverage| {
                if coverage > 0.0 {
                    #[allow(clippy::cast_possible_wrap)]
                    plot(
                        min_x.saturating_add(gx as i32),
                        min_y.saturating_add(gy as i32),
                        coverage.min(1.0),
                    );
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_font_loads() {
        let face = Face::load(EMBEDDED_FONT, 40.0, 100.0).unwrap();
        assert!(face.scale().y > 0.0);
    }

    #[test]
    fn corrupt_font_fails_to_load() {
        let err = Face::load(b"definitely not a font", 40.0, 100.0).unwrap_err();
        assert!(matches!(err, crate::Error::FontLoad(_)));
    }

    #[test]
    fn scale_grows_with_size_and_dpi() {
        let base = Face::load(EMBEDDED_FONT, 20.0, 72.0).unwrap().scale();
        let bigger = Face::load(EMBEDDED_FONT, 40.0, 72.0).unwrap().scale();
        let denser = Face::load(EMBEDDED_FONT, 20.0, 144.0).unwrap().scale();
        assert!((bigger.y - 2.0 * base.y).abs() < 1e-3);
        assert!((denser.y - bigger.y).abs() < 1e-3);
    }

    #[test]
    fn layout_advances_left_to_right() {
        let face = Face::load(EMBEDDED_FONT, 40.0, 100.0).unwrap();
        let glyphs = face.layout("AVA", 10.0, 50.0);
        assert_eq!(glyphs.len(), 3);
        assert!((glyphs[0].position.x - 10.0).abs() < f32::EPSILON);
        assert!(glyphs[1].position.x > glyphs[0].position.x);
        assert!(glyphs[2].position.x > glyphs[1].position.x);
        assert!(glyphs.iter().all(|g| (g.position.y - 50.0).abs() < f32::EPSILON));
    }

    #[test]
    fn whitespace_has_no_outline() {
        let face = Face::load(EMBEDDED_FONT, 40.0, 100.0).unwrap();
        assert!(face.outline("   ", 0.0, 0.0).is_empty());
        assert_eq!(face.outline("a b", 0.0, 0.0).len(), 2);
    }

    #[test]
    fn rasterize_plots_above_the_baseline() {
        let face = Face::load(EMBEDDED_FONT, 40.0, 100.0).unwrap();
        let mut plotted = 0;
        face.rasterize("H", 20, 80, |x, y, c| {
            assert!(x >= 20);
            assert!(y < 80);
            assert!(c > 0.0 && c <= 1.0);
            plotted += 1;
        });
        assert!(plotted > 0);
    }
}
