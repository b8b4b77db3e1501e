use crate::config::{Config, load_config};
use crate::layout::{Canvas, compute_layout_seeded};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_scores;
use crate::render::{render_svg, write_output_svg};
use crate::text_metrics::measurer_for;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rankcloud", version, about = "Render a leaderboard as a radial word cloud")]
pub struct Args {
    /// Score list (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, canvasSize)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas side length in pixels (overrides the config file)
    #[arg(short = 's', long = "size")]
    pub size: Option<f32>,

    /// Seed for a reproducible layout
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Write the computed placements as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Use estimated glyph widths instead of system fonts
    #[arg(long = "fastText")]
    pub fast_text: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    let input = read_input(args.input.as_deref())?;
    let entries = parse_scores(&input)?;
    tracing::info!(entries = entries.len(), "scores loaded");

    let canvas = Canvas::new(config.render.canvas_size, config.layout.boundary_margin);
    let measurer = measurer_for(&config.layout);
    let layout = compute_layout_seeded(
        &entries,
        &config.theme,
        &config.layout,
        canvas,
        measurer.as_ref(),
        args.seed,
    );
    if !layout.unplaced.is_empty() {
        tracing::info!(dropped = layout.unplaced.len(), "some names did not fit");
    }

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)?;
    }

    let svg = render_svg(&layout, &config.theme);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config)?;
        }
    }
    Ok(())
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(size) = args.size {
        if !(size.is_finite() && size > 0.0) {
            return Err(anyhow::anyhow!("Canvas size must be positive, got {size}"));
        }
        config.render.canvas_size = size;
    }
    if args.fast_text {
        config.layout.fast_text_metrics = true;
    }
    Ok(config)
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
