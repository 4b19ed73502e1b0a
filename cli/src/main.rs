// cli/src/main.rs
//
// Command-line front end for the smartcrop library: decode an image, find the
// best crop for a target size, crop, optionally resize, and encode the result.
//
// Logging goes through `log` with `env_logger` as the backend. `RUST_LOG`
// overrides the default filter; `-v` raises it to debug.

mod args;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use smartcrop::Analyzer;

use args::{output_size, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let img = image::open(&cli.input)
        .with_context(|| format!("can't decode input file {}", cli.input.display()))?;

    let target = cli.target(img.width(), img.height());
    let mut analyzer = Analyzer::new().debug_mode(cli.debug);
    if let Some(model) = &cli.face_model {
        analyzer = analyzer.face_detection(true).face_model_path(model);
    }

    let best = analyzer
        .find_best_crop(&img, target.0, target.1)
        .with_context(|| format!("failed to analyze {}", cli.input.display()))?;
    let c = best.crop;
    log::info!(
        "best crop: {}x{}+{}+{} (score {:.4})",
        c.width,
        c.height,
        c.x,
        c.y,
        best.score.total
    );

    let mut cropped = img.crop_imm(c.x, c.y, c.width, c.height);
    if !cli.no_resize {
        let (w, h) = output_size(target, c.width, c.height);
        if (w, h) != (c.width, c.height) {
            log::debug!("resizing {}x{} -> {w}x{h}", c.width, c.height);
            cropped = cropped.resize_exact(w, h, FilterType::Lanczos3);
        }
    }

    if cli.writes_to_stdout() {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        cropped
            .write_with_encoder(PngEncoder::new(&mut out))
            .context("failed to write PNG to stdout")?;
        out.flush()?;
    } else {
        save(&cropped, &cli.output, cli.quality)?;
    }
    Ok(())
}

fn save(img: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("can't infer output format from {}", path.display()))?;

    if format == ImageFormat::Jpeg {
        let file = File::create(path)
            .with_context(|| format!("can't create output file {}", path.display()))?;
        let mut out = BufWriter::new(file);
        // JPEG has no alpha channel.
        DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut out, quality))
            .with_context(|| format!("failed to encode {}", path.display()))?;
        out.flush()?;
    } else {
        img.save_with_format(path, format)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
