//! mozaik: CLI adapter around the pixelation pipeline.
//!
//! Decodes an image file, pixelates it into an X-by-Y grid of flat
//! averaged cells, and encodes the result. Decoding and encoding live
//! here so the pipeline crate stays free of filesystem concerns.
//!
//! # Usage
//!
//! ```text
//! mozaik input.png -o output.png -x 32 -y 24 [--grayscale] [--jobs 4]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mozaik_pipeline::{PixelateOptions, pixelate};

/// Pixelate an image into a flat-colored X-by-Y mosaic.
///
/// Each grid cell is filled with the average color of the source pixels
/// it covers. Cell counts must be positive and no larger than the
/// corresponding image dimension.
#[derive(Parser)]
#[command(name = "mozaik", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Output image path; the format is chosen from the extension.
    #[arg(short, long)]
    output: PathBuf,

    /// Number of cell columns.
    #[arg(short = 'x', long, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    x_cells: u32,

    /// Number of cell rows.
    #[arg(short = 'y', long, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    y_cells: u32,

    /// Collapse every cell color to grayscale.
    #[arg(long)]
    grayscale: bool,

    /// Maximum number of worker threads.
    ///
    /// Defaults to the hardware parallelism hint; always clamped to the
    /// stripe count.
    #[arg(short = 'j', long)]
    jobs: Option<NonZeroUsize>,

    /// Full pixelation options as a JSON string.
    ///
    /// When provided, `--grayscale` and `--jobs` are ignored. The JSON
    /// must be a valid `PixelateOptions` serialization.
    #[arg(long)]
    options_json: Option<String>,
}

/// Build [`PixelateOptions`] from CLI arguments.
///
/// If `--options-json` is provided, the JSON is parsed directly and the
/// individual option flags are ignored.
fn options_from_cli(cli: &Cli) -> Result<PixelateOptions, String> {
    if let Some(ref json) = cli.options_json {
        return serde_json::from_str(json).map_err(|e| format!("error parsing --options-json: {e}"));
    }

    Ok(PixelateOptions {
        grayscale: cli.grayscale,
        concurrency_limit: cli.jobs,
    })
}

fn run(cli: &Cli) -> Result<(), String> {
    let options = options_from_cli(cli)?;

    let source = image::open(&cli.input)
        .map_err(|e| format!("failed to open {}: {e}", cli.input.display()))?
        .to_rgba8();
    log::info!(
        "pixelating {} ({}x{}) into a {}x{} grid",
        cli.input.display(),
        source.width(),
        source.height(),
        cli.x_cells,
        cli.y_cells,
    );

    let result = pixelate(&source, cli.x_cells, cli.y_cells, &options)
        .map_err(|e| format!("pixelation failed: {e}"))?;

    result
        .save(&cli.output)
        .map_err(|e| format!("failed to write {}: {e}", cli.output.display()))?;
    println!(
        "Wrote {} ({}x{} pixels, {}x{} cells)",
        cli.output.display(),
        result.width(),
        result.height(),
        cli.x_cells,
        cli.y_cells,
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}
