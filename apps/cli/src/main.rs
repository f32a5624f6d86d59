use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tubecast_core::{
    DemodFilter, Frame, Pipeline, PipelineConfig, SeparatorKind, SignalType, SourceSettings,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Runs an image through the composite-video codec")]
struct Args {
    /// Input image (PNG and friends).
    input: PathBuf,
    /// Output image path.
    output: PathBuf,
    /// Timing preset: nes, snes512, pc320, pc640, genesis.
    #[arg(long, default_value = "nes")]
    preset: String,
    /// Signal path: rgb, svideo, composite.
    #[arg(long, default_value = "composite")]
    signal: String,
    /// Y/C separator: lowbandpass, rollingaverage.
    #[arg(long, default_value = "lowbandpass")]
    separator: String,
    /// Chroma demodulation filter: iir, fir, rollingaverage.
    #[arg(long, default_value = "iir")]
    demod: String,
    #[arg(long, default_value_t = 0.0)]
    hue: f32,
    #[arg(long, default_value_t = 1.0)]
    saturation: f32,
    #[arg(long, default_value_t = 1.0)]
    brightness: f32,
    #[arg(long, default_value_t = 0.0)]
    sharpness: f32,
    #[arg(long, default_value_t = 0.0)]
    noise: f32,
    #[arg(long, default_value_t = 0.0)]
    ghost: f32,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let config = build_config(args)?;

    let source = image::open(&args.input)
        .map_err(|e| format!("cannot read {}: {e}", args.input.display()))?
        .to_rgba8();
    let (width, height) = (source.width() as usize, source.height() as usize);

    let mut frame = Frame::new(width, height);
    for (i, pixel) in source.pixels().enumerate() {
        let [r, g, b, _] = pixel.0;
        frame.data[i] = u32::from(r) | u32::from(g) << 8 | u32::from(b) << 16;
    }

    let bar = ProgressBar::new(height as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} scanlines")
            .map_err(|e| e.to_string())?,
    );

    let mut pipeline = Pipeline::new(config, width);
    let out = pipeline.process_frame_with_progress(&frame, |progress| {
        bar.set_position((progress * height as f32) as u64);
    });
    bar.finish();

    let mut result = image::RgbaImage::new(out.width as u32, out.height as u32);
    for (i, pixel) in result.pixels_mut().enumerate() {
        let value = out.data[i];
        pixel.0 = [
            (value & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            ((value >> 16) & 0xff) as u8,
            0xff,
        ];
    }
    result
        .save(&args.output)
        .map_err(|e| format!("cannot write {}: {e}", args.output.display()))?;

    println!(
        "{}x{} -> {}x{} ({})",
        width, height, out.width, out.height, args.preset
    );
    Ok(())
}

fn build_config(args: &Args) -> Result<PipelineConfig, String> {
    let source = match args.preset.to_lowercase().as_str() {
        "nes" => SourceSettings::nes(),
        "snes512" => SourceSettings::snes_512(),
        "pc320" => SourceSettings::pc_composite_320(),
        "pc640" => SourceSettings::pc_composite_640(),
        "genesis" => SourceSettings::genesis_320(),
        other => return Err(format!("unknown preset: {other}")),
    };

    let signal_type = match args.signal.to_lowercase().as_str() {
        "rgb" => SignalType::Rgb,
        "svideo" => SignalType::SVideo,
        "composite" => SignalType::Composite,
        other => return Err(format!("unknown signal type: {other}")),
    };

    let separator = match args.separator.to_lowercase().as_str() {
        "lowbandpass" => SeparatorKind::LowBandPass,
        "rollingaverage" => SeparatorKind::RollingAverage,
        other => return Err(format!("unknown separator: {other}")),
    };

    let demod_filter = match args.demod.to_lowercase().as_str() {
        "iir" => DemodFilter::Iir,
        "fir" => DemodFilter::Fir,
        "rollingaverage" => DemodFilter::RollingAverage,
        other => return Err(format!("unknown demodulation filter: {other}")),
    };

    let mut config = PipelineConfig {
        source,
        signal_type,
        separator,
        demod_filter,
        ..Default::default()
    };
    config.knobs.hue = args.hue;
    config.knobs.saturation = args.saturation;
    config.knobs.brightness = args.brightness;
    config.knobs.sharpness = args.sharpness;
    config.artifacts.noise_strength = args.noise;
    config.artifacts.ghost_visibility = args.ghost;
    Ok(config)
}
