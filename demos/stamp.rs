//! Stamp a tiled, rotated watermark onto a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example stamp -- input.jpg output.png "CONFIDENTIAL"
//! ```

use std::env;
use std::path::Path;
use std::process;

use text_watermark::{Position, WatermarkEngine, WatermarkSpec};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <input> <output> <text>", args[0]);
        process::exit(1);
    }

    let spec = WatermarkSpec {
        size: 18.0,
        color: "#C0C0C0".to_string(),
        position: Some(Position::Full),
        angle: 30.0,
        ..WatermarkSpec::new(args[3].as_str())
    };

    let engine = WatermarkEngine::new().expect("failed to initialize engine");
    let result = engine.process_file(Path::new(&args[1]), Path::new(&args[2]), &spec);

    if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
