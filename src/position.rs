//! Position resolution: where on the canvas each stamp goes.
//!
//! Named anchors sit on a 10% inset from the canvas edges. [`Position::Full`]
//! is a tiling directive covering the whole canvas with a grid of stamps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Padding added to the text box to get the tile interval in `Full` mode.
pub const TILE_PADDING: u32 = 40;

/// Coordinate substituted for a negative explicit `x` or `y`.
pub const DEFAULT_COORDINATE: i32 = 100;

/// A named watermark placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Top-left corner, inset by the margin.
    LeftTop,
    /// Bottom-left corner, inset by the margin.
    LeftBottom,
    /// Top-right corner, inset by the margin.
    RightTop,
    /// Bottom-right corner, inset by the margin.
    RightBottom,
    /// Half of the inset bottom-right corner.
    Center,
    /// Tile the whole canvas.
    Full,
}

impl Position {
    /// Every position, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::LeftTop,
        Self::LeftBottom,
        Self::RightTop,
        Self::RightBottom,
        Self::Center,
        Self::Full,
    ];

    /// The canonical name, as used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftTop => "LeftTop",
            Self::LeftBottom => "LeftBottom",
            Self::RightTop => "RightTop",
            Self::RightBottom => "RightBottom",
            Self::Center => "Center",
            Self::Full => "Full",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a position name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPosition(pub String);

impl fmt::Display for UnknownPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown position {:?} (expected one of LeftTop, LeftBottom, RightTop, RightBottom, Center, Full)",
            self.0
        )
    }
}

impl std::error::Error for UnknownPosition {}

impl FromStr for Position {
    type Err = UnknownPosition;

    /// Case-insensitive; `-` and `_` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().to_ascii_lowercase() == key)
            .ok_or_else(|| UnknownPosition(s.to_string()))
    }
}

/// Deserialize an optional position where `""` and `null` mean "none".
///
/// # Errors
///
/// Fails on names that are not a [`Position`].
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(name) => name.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A draw origin in destination-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Origin {
    /// Build an origin.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Resolve a named position on a `width x height` canvas.
///
/// `text` is the measured `(width, height)` of the watermark text; only
/// [`Position::Full`] uses it, to space tiles `text + 40` apart. Every
/// other position yields exactly one origin.
#[must_use]
pub fn resolve(position: Position, width: u32, height: u32, text: (u32, u32)) -> Vec<Origin> {
    let (w, h) = (to_i32(width), to_i32(height));
    let (dx, dy) = margin(width, height);

    match position {
        Position::LeftTop => vec![Origin::new(dx, dy)],
        Position::LeftBottom => vec![Origin::new(dx, h - dy)],
        Position::RightTop => vec![Origin::new(w - dx, dy)],
        Position::RightBottom => vec![Origin::new(w - dx, h - dy)],
        // Halves the inset corner rather than centering the text.
        Position::Center => vec![Origin::new((w - dx) / 2, (h - dy) / 2)],
        Position::Full => tile(width, height, text),
    }
}

/// Resolve explicit coordinates, substituting [`DEFAULT_COORDINATE`] for negatives.
#[must_use]
pub fn resolve_explicit(x: i32, y: i32) -> Origin {
    let x = if x < 0 { DEFAULT_COORDINATE } else { x };
    let y = if y < 0 { DEFAULT_COORDINATE } else { y };
    Origin::new(x, y)
}

/// The `(x, y)` interval between tiles for text of the given size.
#[must_use]
pub fn tile_interval(text: (u32, u32)) -> (u32, u32) {
    (text.0 + TILE_PADDING, text.1 + TILE_PADDING)
}

/// 10% inset, truncated toward zero.
#[allow(clippy::cast_possible_truncation)]
fn margin(width: u32, height: u32) -> (i32, i32) {
    (
        (f64::from(width) * 0.1) as i32,
        (f64::from(height) * 0.1) as i32,
    )
}

fn tile(width: u32, height: u32, text: (u32, u32)) -> Vec<Origin> {
    let (ix, iy) = tile_interval(text);
    let mut origins = Vec::new();

    for y in (0..height).step_by(step(iy)) {
        for x in (0..width).step_by(step(ix)) {
            origins.push(Origin::new(to_i32(x), to_i32(y)));
        }
    }

    log::debug!(
        "tiling {width}x{height} every {ix}x{iy}px: {} stamps",
        origins.len()
    );
    origins
}

fn step(interval: u32) -> usize {
    usize::try_from(interval).unwrap_or(usize::MAX)
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZES: [(u32, u32); 6] = [(1, 1), (7, 3), (200, 200), (640, 480), (1920, 1080), (9, 4000)];

    #[test]
    fn anchors_follow_ten_percent_inset() {
        let one = |p| resolve(p, 200, 100, (0, 0))[0];
        assert_eq!(one(Position::LeftTop), Origin::new(20, 10));
        assert_eq!(one(Position::LeftBottom), Origin::new(20, 90));
        assert_eq!(one(Position::RightTop), Origin::new(180, 10));
        assert_eq!(one(Position::RightBottom), Origin::new(180, 90));
        assert_eq!(one(Position::Center), Origin::new(90, 45));
    }

    #[test]
    fn margin_truncates() {
        // 0.1 * 15 = 1.5 -> 1
        assert_eq!(resolve(Position::LeftTop, 15, 9, (0, 0)), vec![Origin::new(1, 0)]);
    }

    #[test]
    fn anchors_stay_on_canvas() {
        let anchors = [
            Position::LeftTop,
            Position::LeftBottom,
            Position::RightTop,
            Position::RightBottom,
            Position::Center,
        ];
        for (w, h) in SIZES {
            for p in anchors {
                let origins = resolve(p, w, h, (30, 10));
                assert_eq!(origins.len(), 1);
                let o = origins[0];
                assert!((0..=to_i32(w)).contains(&o.x), "{p} on {w}x{h}: {o:?}");
                assert!((0..=to_i32(h)).contains(&o.y), "{p} on {w}x{h}: {o:?}");
            }
        }
    }

    #[test]
    fn full_tiles_cover_canvas_on_a_padded_grid() {
        let text = (57, 23);
        let (ix, iy) = tile_interval(text);
        assert_eq!((ix, iy), (97, 63));

        for (w, h) in SIZES {
            let origins = resolve(Position::Full, w, h, text);
            let expected = w.div_ceil(ix) * h.div_ceil(iy);
            assert_eq!(origins.len(), expected as usize, "{w}x{h}");
            assert_eq!(origins[0], Origin::new(0, 0));
            for o in &origins {
                assert_eq!(o.x % to_i32(ix), 0);
                assert_eq!(o.y % to_i32(iy), 0);
                assert!(o.x < to_i32(w) && o.y < to_i32(h));
            }
        }
    }

    #[test]
    fn full_tiles_row_major() {
        let origins = resolve(Position::Full, 100, 100, (10, 10));
        assert_eq!(
            origins,
            vec![
                Origin::new(0, 0),
                Origin::new(50, 0),
                Origin::new(0, 50),
                Origin::new(50, 50),
            ]
        );
    }

    #[test]
    fn explicit_negatives_default_to_100() {
        assert_eq!(resolve_explicit(-1, -1), Origin::new(100, 100));
        assert_eq!(resolve_explicit(-50, 7), Origin::new(100, 7));
        assert_eq!(resolve_explicit(0, -3), Origin::new(0, 100));
        assert_eq!(resolve_explicit(12, 34), Origin::new(12, 34));
    }

    #[test]
    fn parses_names_loosely() {
        assert_eq!("LeftTop".parse(), Ok(Position::LeftTop));
        assert_eq!("right-bottom".parse(), Ok(Position::RightBottom));
        assert_eq!("CENTER".parse(), Ok(Position::Center));
        assert_eq!("full".parse(), Ok(Position::Full));
        assert!("middle".parse::<Position>().is_err());
        for p in Position::ALL {
            assert_eq!(p.to_string().parse(), Ok(p));
        }
    }

    #[test]
    fn deserializes_empty_as_none() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "deserialize_optional")]
            position: Option<Position>,
        }

        let parse = |s: &str| serde_json::from_str::<Holder>(s).map(|h| h.position);
        assert_eq!(parse(r#"{"position":""}"#).unwrap(), None);
        assert_eq!(parse(r#"{"position":null}"#).unwrap(), None);
        assert_eq!(parse("{}").unwrap(), None);
        assert_eq!(parse(r#"{"position":"Full"}"#).unwrap(), Some(Position::Full));
        assert!(parse(r#"{"position":"Diagonal"}"#).is_err());
    }
}
