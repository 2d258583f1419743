//! Stamp rendering: drawing text onto an RGBA canvas, optionally rotated.
//!
//! Unrotated text is drawn straight onto the destination, blending each
//! glyph's coverage over the existing pixels. Rotated text is first drawn
//! onto a transparent square scratch canvas, rotated with nearest-neighbor
//! inverse sampling, then pasted with an alpha test: any pixel with nonzero
//! alpha replaces the destination pixel wholesale.
//!
//! All writes are clipped to the destination bounds.

use image::{Rgba, RgbaImage};

use crate::color::Color;
use crate::font::Face;
use crate::metrics::{self, TextBounds};
use crate::position::Origin;

/// A watermark stamp prepared once and applied at any number of origins.
#[derive(Debug)]
pub enum Stamp<'a, 'f> {
    /// Draw glyphs directly onto the destination.
    Direct {
        /// Face the text is rasterized with.
        face: &'a Face<'f>,
        /// Text to draw.
        text: &'a str,
        /// Fill color.
        color: Color,
        /// Tight box of the text at baseline origin.
        bounds: TextBounds,
    },
    /// Paste a pre-rotated square image with alpha-test compositing.
    Rotated(RgbaImage),
}

impl<'a, 'f> Stamp<'a, 'f> {
    /// Prepare `text` for stamping; `angle` is in degrees.
    ///
    /// A zero angle selects the direct path. Any other angle renders and
    /// rotates the scratch canvas here, once.
    #[must_use]
    pub fn prepare(face: &'a Face<'f>, text: &'a str, color: Color, angle: f64) -> Self {
        let bounds = metrics::bounds(face, text);
        if angle == 0.0 {
            Self::Direct {
                face,
                text,
                color,
                bounds,
            }
        } else {
            let scratch = render_scratch(face, text, color, bounds);
            Self::Rotated(rotate(&scratch, angle))
        }
    }

    /// Stamp onto `dst` at `origin`.
    ///
    /// On the direct path `origin.y` is the top of the text box and the
    /// baseline sits one text height below it. A negative `origin.x` centers
    /// the text horizontally; a negative `origin.y` centers it vertically.
    /// On the rotated path `origin` is the top-left corner of the rotated
    /// square.
    pub fn apply(&self, dst: &mut RgbaImage, origin: Origin) {
        match self {
            Self::Direct {
                face,
                text,
                color,
                bounds,
            } => {
                let (tw, th) = (to_i32(bounds.width()), to_i32(bounds.height()));
                let (w, h) = (to_i32(dst.width()), to_i32(dst.height()));

                let x = if origin.x < 0 {
                    w.saturating_sub(tw) / 2
                } else {
                    origin.x
                };
                let baseline = if origin.y < 0 {
                    (h.saturating_sub(th) / 2).saturating_add(th.saturating_mul(4) / 5)
                } else {
                    origin.y.saturating_add(th)
                };
                draw_text(dst, face, text, *color, x, baseline);
            }
            Self::Rotated(image) => composite_alpha_test(dst, image, origin),
        }
    }
}

/// Stamp `text` once onto `dst` at `origin`, rotated by `angle` degrees.
pub fn stamp(
    face: &Face<'_>,
    text: &str,
    color: Color,
    origin: Origin,
    angle: f64,
    dst: &mut RgbaImage,
) {
    Stamp::prepare(face, text, color, angle).apply(dst, origin);
}

/// Draw `text` with its baseline origin at `(x, baseline)`.
///
/// Each covered pixel is blended toward `color` by its glyph coverage.
pub fn draw_text(
    dst: &mut RgbaImage,
    face: &Face<'_>,
    text: &str,
    color: Color,
    x: i32,
    baseline: i32,
) {
    face.rasterize(text, x, baseline, |px, py, coverage| {
        if let Some(pixel) = pixel_mut(dst, px, py) {
            blend_over(pixel, color, coverage);
        }
    });
}

/// Rotate `src` by `angle` degrees about its center, keeping its size.
///
/// Every destination pixel samples the source at its center offset rotated
/// by `angle`, truncated toward zero. Samples that land outside the source
/// are left fully transparent.
#[must_use]
pub fn rotate(src: &RgbaImage, angle: f64) -> RgbaImage {
    let (w, h) = src.dimensions();
    let (sin, cos) = angle.to_radians().sin_cos();
    let cx = f64::from(w) / 2.0;
    let cy = f64::from(h) / 2.0;

    let mut out = RgbaImage::new(w, h);
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let dx = f64::from(x) - cx;
        let dy = f64::from(y) - cy;
        #[allow(clippy::cast_possible_truncation)]
        let (sx, sy) = (
            (cx + dx * cos - dy * sin) as i64,
            (cy + dx * sin + dy * cos) as i64,
        );
        if let (Ok(sx), Ok(sy)) = (u32::try_from(sx), u32::try_from(sy)) {
            if sx < w && sy < h {
                *pixel = *src.get_pixel(sx, sy);
            }
        }
    }
    out
}

/// Paste `src` onto `dst` with its top-left corner at `origin`.
///
/// Pixels with nonzero alpha replace the destination pixel; fully
/// transparent pixels leave it untouched. Nothing is blended.
pub fn composite_alpha_test(dst: &mut RgbaImage, src: &RgbaImage, origin: Origin) {
    for (x, y, pixel) in src.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        let tx = i64::from(origin.x) + i64::from(x);
        let ty = i64::from(origin.y) + i64::from(y);
        if let Some(target) = pixel_mut_i64(dst, tx, ty) {
            *target = *pixel;
        }
    }
}

/// Blend `color` over `pixel` with the given coverage (straight alpha).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn blend_over(pixel: &mut Rgba<u8>, color: Color, coverage: f32) {
    let src_a = coverage.clamp(0.0, 1.0) * f32::from(color.a) / 255.0;
    let dst_a = f32::from(pixel[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return;
    }

    let channel = |src: u8, dst: u8| -> u8 {
        let v = (f32::from(src) * src_a + f32::from(dst) * dst_a * (1.0 - src_a)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };

    *pixel = Rgba([
        channel(color.r, pixel[0]),
        channel(color.g, pixel[1]),
        channel(color.b, pixel[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
}

/// Square transparent canvas, `ceil(hypot(w, h))` on a side, with the text
/// baseline centered in it.
fn render_scratch(face: &Face<'_>, text: &str, color: Color, bounds: TextBounds) -> RgbaImage {
    let (tw, th) = (bounds.width(), bounds.height());
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let diag = f64::from(tw).hypot(f64::from(th)).ceil() as u32;

    let mut scratch = RgbaImage::new(diag, diag);
    let (d, tw, th) = (to_i32(diag), to_i32(tw), to_i32(th));
    draw_text(
        &mut scratch,
        face,
        text,
        color,
        (d - tw) / 2,
        (d + th * 4 / 5) / 2,
    );
    scratch
}

fn pixel_mut(img: &mut RgbaImage, x: i32, y: i32) -> Option<&mut Rgba<u8>> {
    pixel_mut_i64(img, i64::from(x), i64::from(y))
}

fn pixel_mut_i64(img: &mut RgbaImage, x: i64, y: i64) -> Option<&mut Rgba<u8>> {
    let x = u32::try_from(x).ok()?;
    let y = u32::try_from(y).ok()?;
    if x < img.width() && y < img.height() {
        Some(img.get_pixel_mut(x, y))
    } else {
        None
    }
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
