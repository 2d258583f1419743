//! Stamp text watermarks onto raster images.
//!
//! A [`WatermarkSpec`] names the text, its size and color, and where it goes:
//! a named anchor, a tiling over the whole canvas, or explicit coordinates,
//! optionally rotated. The [`WatermarkEngine`] turns a spec and a decoded
//! image into a new RGBA image; the source is never modified.
//!
//! # Quick Start
//!
//! ```no_run
//! use text_watermark::{Position, WatermarkEngine, WatermarkSpec};
//!
//! let engine = WatermarkEngine::new().expect("failed to init engine");
//! let img = image::open("photo.jpg").unwrap();
//! let spec = WatermarkSpec {
//!     color: "#FFFFFF".to_string(),
//!     position: Some(Position::RightBottom),
//!     ..WatermarkSpec::new("© 2025")
//! };
//! let stamped = engine.render(&spec, &img).unwrap();
//! stamped.save("stamped.png").unwrap();
//! ```
//!
//! # Placement
//!
//! Anchors sit on a 10% inset from the canvas edges. [`Position::Full`]
//! repeats the stamp on a grid spaced by the text size plus 40 pixels.
//! Without a position the stamp goes to `(x, y)`, with negative
//! coordinates replaced by 100.
//!
//! ```no_run
//! use text_watermark::{Position, WatermarkEngine, WatermarkSpec};
//!
//! let engine = WatermarkEngine::new().expect("failed to init engine");
//! let img = image::open("photo.jpg").unwrap();
//! let spec = WatermarkSpec {
//!     size: 18.0,
//!     color: "#888".to_string(),
//!     position: Some(Position::Full),
//!     angle: 30.0,
//!     ..WatermarkSpec::new("CONFIDENTIAL")
//! };
//! let tiled = engine.render(&spec, &img).unwrap();
//! ```

#![deny(missing_docs)]

pub mod color;
pub mod config;
mod engine;
pub mod error;
pub mod font;
pub mod metrics;
pub mod position;
pub mod stamp;

pub use color::{parse_hex_color, Color};
pub use config::{load_config, AppConfig};
pub use engine::{
    default_output_path, is_supported_image, save_image, ProcessResult, WatermarkEngine,
    WatermarkSpec, DEFAULT_COLOR, DEFAULT_DPI, DEFAULT_SIZE,
};
pub use error::{Error, Result};
pub use font::{Face, EMBEDDED_FONT};
pub use position::{Origin, Position};
