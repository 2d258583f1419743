use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::{debug, error, info, warn};

use text_watermark::{
    default_output_path, load_config, Position, ProcessResult, WatermarkEngine,
    WatermarkSpec,
};

#[derive(Parser)]
#[command(
    name = "text-watermark",
    about = "Stamp a text watermark onto images",
    version,
    after_help = "Simple usage: text-watermark <image> --text \"(c) me\"  (writes <image>.watermark.png)\n\n\
                  Positions: LeftTop, LeftBottom, RightTop, RightBottom, Center, Full (tiled).\n\
                  Without --position the stamp goes to (x, y); negative values mean 100."
)]
struct Cli {
    /// Input image file or directory
    input: String,

    /// Output file or directory (default: {name}.watermark.png)
    #[arg(short, long)]
    output: Option<String>,

    /// JSON configuration file with a "watermark" object
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Watermark text (overrides the config)
    #[arg(long)]
    text: Option<String>,

    /// Font size in points
    #[arg(long)]
    size: Option<f32>,

    /// Rasterization resolution in dots per inch
    #[arg(long)]
    dpi: Option<f32>,

    /// Text color as #RGB or #RRGGBB
    #[arg(long)]
    color: Option<String>,

    /// Explicit horizontal origin (ignored with --position)
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    x: Option<i32>,

    /// Explicit vertical origin (ignored with --position)
    #[arg(short = 'y', long, allow_negative_numbers = true)]
    y: Option<i32>,

    /// Named placement
    #[arg(short, long)]
    position: Option<Position>,

    /// Rotation in degrees
    #[arg(short, long, allow_negative_numbers = true)]
    angle: Option<f64>,

    /// TrueType/OpenType font to use instead of the embedded one
    #[arg(long)]
    font: Option<PathBuf>,

    /// Write a timestamped preview under the temp directory
    #[arg(long)]
    preview: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Start from the config file's watermark (or a blank spec) and apply
    /// flag overrides on top.
    fn spec(&self) -> Result<WatermarkSpec, text_watermark::Error> {
        let base = match &self.config {
            Some(path) => load_config(path)?.watermark,
            None => None,
        };
        let mut spec = base.unwrap_or_else(|| WatermarkSpec::new(""));

        if let Some(text) = &self.text {
            spec.text.clone_from(text);
        }
        if let Some(size) = self.size {
            spec.size = size;
        }
        if let Some(dpi) = self.dpi {
            spec.dpi = dpi;
        }
        if let Some(color) = &self.color {
            spec.color.clone_from(color);
        }
        if let Some(x) = self.x {
            spec.x = x;
        }
        if let Some(y) = self.y {
            spec.y = y;
        }
        if self.position.is_some() {
            spec.position = self.position;
        }
        if let Some(angle) = self.angle {
            spec.angle = angle;
        }
        Ok(spec)
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let spec = match cli.spec() {
        Ok(spec) => spec,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };
    debug!("watermark spec: {spec:?}");

    let engine = match &cli.font {
        Some(path) => std::fs::read(path)
            .map_err(text_watermark::Error::from)
            .and_then(WatermarkEngine::with_font_data),
        None => WatermarkEngine::new(),
    };
    let engine = match engine {
        Ok(e) => e,
        Err(e) => {
            error!("Fatal: Failed to initialize engine: {e}");
            process::exit(1);
        }
    };

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        error!("Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    if !spec.is_enabled() {
        warn!("No watermark text configured; files are passed through unchanged");
    }

    let results = if input_path.is_dir() {
        let Some(output_dir) = cli.output.as_ref().map(PathBuf::from) else {
            error!("Output directory is required for batch processing");
            error!("Usage: text-watermark <input_dir> -o <output_dir> --text <text>");
            process::exit(1);
        };
        engine.process_directory(input_path, &output_dir, &spec)
    } else {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => default_output_path(input_path, cli.preview),
        };
        vec![engine.process_file(input_path, &output_path, &spec)]
    };

    let mut success_count = 0u32;
    let mut skip_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r);
        if r.skipped {
            skip_count += 1;
        } else if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 {
        let mut summary = format!("[Summary] Processed: {success_count}");
        if skip_count > 0 {
            summary.push_str(&format!(", Skipped: {skip_count}"));
        }
        if fail_count > 0 {
            summary.push_str(&format!(", Failed: {fail_count}"));
        }
        info!("{summary} (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult) {
    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.skipped {
        info!("[SKIP] {filename}: {}", result.message);
    } else if result.success {
        match &result.output {
            Some(out) => info!("[OK] {filename} -> {}", out.display()),
            None => info!("[OK] {filename}"),
        }
    } else {
        error!("[FAIL] {filename}: {}", result.message);
    }
}
