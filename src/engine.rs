//! Core watermark engine.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::Deserialize;

use crate::color::{self, Color};
use crate::error::{Error, Result};
use crate::font::{Face, EMBEDDED_FONT};
use crate::metrics;
use crate::position::{self, Position};
use crate::stamp::Stamp;

/// Font size used when the requested size is not positive.
pub const DEFAULT_SIZE: f32 = 40.0;
/// Resolution used when the requested dpi is not positive.
pub const DEFAULT_DPI: f32 = 100.0;
/// Color used when none is given.
pub const DEFAULT_COLOR: &str = "#000000";

/// Directory name under the system temp dir that holds preview renders.
const PREVIEW_DIR: &str = "text-watermark";

/// What to stamp and where.
///
/// Missing JSON fields take zero values, so `{"text": "hi"}` is a complete
/// spec: defaults for size, dpi and color are filled in at render time.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WatermarkSpec {
    /// Text to stamp. Empty disables the watermark.
    pub text: String,
    /// Font size in points.
    pub size: f32,
    /// Rasterization resolution in dots per inch.
    pub dpi: f32,
    /// `#RRGGBB` or `#RGB` fill color.
    pub color: String,
    /// Explicit horizontal origin, used when `position` is `None`.
    pub x: i32,
    /// Explicit vertical origin, used when `position` is `None`.
    pub y: i32,
    /// Named placement; `None` means use `x` and `y`.
    #[serde(deserialize_with = "position::deserialize_optional")]
    pub position: Option<Position>,
    /// Rotation in degrees.
    pub angle: f64,
}

impl WatermarkSpec {
    /// A spec for `text` with every other field left to its default.
    ///
    /// The explicit coordinates are negative, so the stamp lands at
    /// `(100, 100)` unless a position or coordinates are set.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: -1,
            y: -1,
            ..Self::default()
        }
    }

    /// Whether there is anything to stamp.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.text.is_empty()
    }

    /// Validate and fill in defaults.
    ///
    /// Non-positive size and dpi become 40 and 100, an empty color becomes
    /// black. Coordinates are left as given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyText`] if there is no text.
    pub fn normalized(&self) -> Result<Self> {
        if self.text.is_empty() {
            return Err(Error::EmptyText);
        }

        let mut spec = self.clone();
        if spec.size <= 0.0 {
            spec.size = DEFAULT_SIZE;
        }
        if spec.dpi <= 0.0 {
            spec.dpi = DEFAULT_DPI;
        }
        if spec.color.is_empty() {
            spec.color = DEFAULT_COLOR.to_string();
        } else if !color::is_valid_hex_color(&spec.color) {
            log::warn!("malformed color {:?}, stamping in black", spec.color);
        }
        Ok(spec)
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file.
    pub path: PathBuf,
    /// Where the result was written; the input path itself when skipped.
    pub output: Option<PathBuf>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Whether the file was passed through without a watermark.
    pub skipped: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            output: None,
            success: false,
            skipped: false,
            message,
        }
    }
}

/// The watermark engine holding the font bytes.
///
/// Create once and reuse; the engine is `Sync`, so one instance can serve
/// concurrent renders. Each render parses its own [`Face`].
pub struct WatermarkEngine {
    font_data: Cow<'static, [u8]>,
}

impl std::fmt::Debug for WatermarkEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkEngine")
            .field("font_bytes", &self.font_data.len())
            .finish()
    }
}

impl WatermarkEngine {
    /// Create an engine using the embedded font.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FontLoad`] if the embedded font cannot be parsed.
    pub fn new() -> Result<Self> {
        Self::from_font(Cow::Borrowed(EMBEDDED_FONT))
    }

    /// Create an engine using a caller-supplied TrueType/OpenType font.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FontLoad`] if `data` is not a parseable font.
    pub fn with_font_data(data: Vec<u8>) -> Result<Self> {
        Self::from_font(Cow::Owned(data))
    }

    fn from_font(font_data: Cow<'static, [u8]>) -> Result<Self> {
        Face::load(&font_data, DEFAULT_SIZE, DEFAULT_DPI)?;
        Ok(Self { font_data })
    }

    /// Stamp `spec` onto a copy of `source`.
    ///
    /// The source is never modified. With a position set, the text is
    /// stamped once per resolved origin (many times for
    /// [`Position::Full`]), all at the same angle. Otherwise it is stamped
    /// once at the explicit coordinates, negatives replaced by 100.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyText`] for an empty text and
    /// [`Error::FontLoad`] if the font cannot be parsed.
    pub fn render(&self, spec: &WatermarkSpec, source: &DynamicImage) -> Result<RgbaImage> {
        let spec = spec.normalized()?;
        let face = Face::load(&self.font_data, spec.size, spec.dpi)?;
        let color: Color = color::parse_hex_color(&spec.color);

        let mut canvas = source.to_rgba8();
        let stamp = Stamp::prepare(&face, &spec.text, color, spec.angle);

        let origins = match spec.position {
            Some(p) => position::resolve(
                p,
                canvas.width(),
                canvas.height(),
                metrics::measure(&face, &spec.text),
            ),
            None => vec![position::resolve_explicit(spec.x, spec.y)],
        };
        log::debug!(
            "stamping {:?} at {} origin(s), angle {}",
            spec.text,
            origins.len(),
            spec.angle
        );

        for origin in origins {
            stamp.apply(&mut canvas, origin);
        }
        Ok(canvas)
    }

    /// Process a single image file: load, stamp, save.
    ///
    /// A disabled spec passes the file through untouched: the result is a
    /// skip whose output is the input path.
    #[must_use]
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        spec: &WatermarkSpec,
    ) -> ProcessResult {
        if !spec.is_enabled() {
            return ProcessResult {
                path: input.to_path_buf(),
                output: Some(input.to_path_buf()),
                success: true,
                skipped: true,
                message: "No watermark configured".to_string(),
            };
        }

        let source = match image::open(input) {
            Ok(img) => img,
            Err(e) => return ProcessResult::failed(input, format!("Failed to load: {e}")),
        };

        let stamped = match self.render(spec, &source) {
            Ok(img) => img,
            Err(e) => return ProcessResult::failed(input, format!("Failed to render: {e}")),
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return ProcessResult::failed(
                        input,
                        format!("Failed to create output directory: {e}"),
                    );
                }
            }
        }

        match save_image(&stamped, output) {
            Ok(()) => ProcessResult {
                path: input.to_path_buf(),
                output: Some(output.to_path_buf()),
                success: true,
                skipped: false,
                message: "Watermark applied".to_string(),
            },
            Err(e) => ProcessResult::failed(input, format!("Failed to save: {e}")),
        }
    }

    /// Process all supported images in a directory.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    /// Each output keeps its input's file name.
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        spec: &WatermarkSpec,
    ) -> Vec<ProcessResult> {
        let inputs: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().is_ok_and(|ft| ft.is_file()))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![ProcessResult::failed(
                    input_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };

        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![ProcessResult::failed(
                output_dir,
                format!("Failed to create output directory: {e}"),
            )];
        }

        let run = |input: &PathBuf| match input.file_name() {
            Some(name) => self.process_file(input, &output_dir.join(name), spec),
            None => ProcessResult::failed(input, "Input has no file name".to_string()),
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            inputs.par_iter().map(run).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            inputs.iter().map(run).collect()
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp" | "gif"
        ),
        None => false,
    }
}

/// Save an RGBA image, choosing the format from the extension.
///
/// JPEG has no alpha channel, so it is dropped for `.jpg` outputs.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            rgb.save_with_format(path, format)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp | ImageFormat::Gif => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate an output path for a watermarked copy of `input`.
///
/// Final renders land next to the input as `"photo.jpg.watermark.png"`.
/// Previews get a timestamped name under the system temp directory, so
/// repeated previews never collide with a cached file.
#[must_use]
pub fn default_output_path(input: &Path, preview: bool) -> PathBuf {
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    if preview {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        std::env::temp_dir()
            .join(PREVIEW_DIR)
            .join(format!("{name}.{stamp}.png"))
    } else {
        let parent = input.parent().unwrap_or(Path::new("."));
        parent.join(format!("{name}.watermark.png"))
    }
}
