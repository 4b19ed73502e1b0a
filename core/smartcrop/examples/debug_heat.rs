//! Dump the heat canvas and the chosen crop for an image.
//!
//! Usage:
//!   RUST_LOG=info cargo run --example debug_heat -- <image> [width] [height]
//!
//! Writes `<image>.heat.png` next to the input. Red is skin (or faces), green
//! is detail, blue is saturation. Per-detector coverage is logged at info.

use std::path::PathBuf;

use smartcrop::Analyzer;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        eprintln!("usage: debug_heat <image> [width] [height]");
        std::process::exit(2);
    };
    let width: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(100);
    let height: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(100);

    let image = image::open(&input).unwrap();
    let best = Analyzer::new()
        .debug_mode(true)
        .find_best_crop(&image, width, height)
        .unwrap();

    println!("=== {} ({}x{}) ===", input.display(), image.width(), image.height());
    println!(
        "  crop: ({}, {}, {}x{})",
        best.crop.x, best.crop.y, best.crop.width, best.crop.height
    );
    println!(
        "  score: total={:.5} detail={:.2} skin={:.2} saturation={:.2}",
        best.score.total, best.score.detail, best.score.skin, best.score.saturation
    );

    let out = input.with_extension("heat.png");
    best.heat.unwrap().save(&out).unwrap();
    println!("  heat canvas written to {}", out.display());
}
