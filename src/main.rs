use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use rand::prelude::*;
use rand_pcg::Pcg64;
use std::path::Path;

use shepp_logan::colour_bands::ColourBands;
use shepp_logan::tomo_image::Image;
use shepp_logan::tomo_scan::Scan;
use shepp_logan::Phantom;

////////////////////////////////////////////////////////////////////////
// Main entry point
//

#[derive(Clone, ValueEnum)]
pub enum Rendering {
    Linear,
    Banded,
}

/// Render the Shepp-Logan phantom and its exact sinogram.
#[derive(Parser)]
#[clap(version = "0.1", author = "Simon Frankau <sgf@arbitrary.name>")]
#[clap(about = "Shepp-Logan phantom and its analytic projections")]
struct Opts {
    /// File to write the rendered phantom to.
    #[clap(long)]
    output_image: Option<String>,
    /// Width of rendered image
    #[clap(long)]
    width: Option<usize>,
    /// Height of rendered image
    #[clap(long)]
    height: Option<usize>,
    /// Linear grey scale, or discrete bands that show the soft tissue.
    #[clap(value_enum, long, default_value = "linear")]
    rendering: Rendering,
    /// Render each pixel from factor x factor samples.
    #[clap(long)]
    supersample: Option<usize>,
    /// File to write the sinogram to.
    #[clap(long)]
    output_scan: Option<String>,
    /// Number of angles to scan from.
    #[clap(long)]
    angles: Option<usize>,
    /// Number of parallel rays fired from each angle.
    #[clap(long)]
    rays: Option<usize>,
    #[clap(long)]
    /// How much uniform noise to add to the scan, as fraction of maximum scan value.
    noise: Option<f64>,
    #[clap(long)]
    /// Seed for the random noise (for reproducibility)
    seed: Option<u64>,
    #[clap(long)]
    /// Compare the analytic scan against numerical integration of the
    /// image, using this many samples per ray.
    check_samples: Option<usize>,
}

const DEFAULT_RESOLUTION: usize = 256;
// Linear rendering maps the skull (2.0) to white.
const LINEAR_SCALE: f64 = 255.0 / 2.0;

fn image_size(opts: &Opts) -> (usize, usize) {
    let width = opts.width.unwrap_or(DEFAULT_RESOLUTION);
    let height = opts.height.unwrap_or(width);
    (width, height)
}

fn render_image(opts: &Opts, phantom: &Phantom) -> Result<Image> {
    let (width, height) = image_size(opts);
    ensure!(width > 0 && height > 0, "--width and --height must be non-zero");
    let factor = opts.supersample.unwrap_or(1);
    ensure!(factor > 0, "--supersample must be at least 1");

    let image = Image::render_supersampled(phantom, width, height, factor);
    Ok(match opts.rendering {
        Rendering::Linear => image.scale_values(LINEAR_SCALE),
        Rendering::Banded => image.banded(&ColourBands::default()),
    })
}

fn scan_size(opts: &Opts) -> Result<(usize, usize)> {
    let (width, height) = image_size(opts);
    let resolution = width.max(height);
    let angles = opts.angles.unwrap_or_else(|| {
        eprintln!("--angles not specified, using {}.", resolution);
        resolution
    });
    let rays = opts.rays.unwrap_or_else(|| {
        eprintln!("--rays not specified, using {}.", resolution);
        resolution
    });
    ensure!(angles > 0, "--angles must be at least 1");
    ensure!(rays > 1, "--rays must be at least 2");
    Ok((angles, rays))
}

fn add_noise(scan: &Scan, opts: &Opts) -> Scan {
    const DEFAULT_SEED: u64 = 42;
    const DEFAULT_NOISE: f64 = 0.0;

    let seed = opts.seed.unwrap_or(DEFAULT_SEED);
    let noise = opts.noise.unwrap_or(DEFAULT_NOISE);

    let mut rng = Pcg64::seed_from_u64(seed);
    scan.add_noise(&mut rng, noise)
}

fn check_scan(phantom: &Phantom, scan: &Scan, samples: usize) -> Result<()> {
    eprint!("Integrating numerically... ");
    let numerical = Scan::numerical(phantom, scan.angles, scan.rays, samples)?;
    eprintln!("done!");

    println!("RMS of analytic vs. numerical scan: {}", scan.rms_diff(&numerical)?);
    println!("Max of analytic vs. numerical scan: {}", scan.max_abs_diff(&numerical)?);
    Ok(())
}

fn check_opts(opts: &Opts) -> Result<()> {
    ensure!(
        opts.output_image.is_some() || opts.output_scan.is_some() || opts.check_samples.is_some(),
        "Nothing to do: specify --output-image, --output-scan and/or --check-samples"
    );
    if opts.output_image.is_none() {
        ensure!(
            opts.supersample.is_none(),
            "--supersample can only be used with --output-image"
        );
    }
    if opts.output_scan.is_none() && opts.check_samples.is_none() {
        ensure!(
            opts.angles.is_none() && opts.rays.is_none(),
            "--angles and --rays can only be used with --output-scan or --check-samples"
        );
    }
    if opts.output_scan.is_none() {
        ensure!(
            opts.noise.is_none(),
            "--noise can only be used with --output-scan"
        );
    }
    if let Some(noise) = opts.noise {
        ensure!(noise >= 0.0, "--noise must not be negative");
    } else {
        ensure!(
            opts.seed.is_none(),
            "--seed can only be used with --noise"
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();
    check_opts(&opts)?;

    let phantom = Phantom::new();

    if let Some(ref name) = opts.output_image {
        eprint!("Rendering... ");
        let image = render_image(&opts, &phantom)?;
        eprintln!("done!");
        image
            .to_gray_image()?
            .save(Path::new(name))
            .with_context(|| format!("Failed to write image to {}", name))?;
    }

    if opts.output_scan.is_none() && opts.check_samples.is_none() {
        return Ok(());
    }

    let (angles, rays) = scan_size(&opts)?;
    let scan = Scan::analytic(&phantom, angles, rays);

    if let Some(samples) = opts.check_samples {
        check_scan(&phantom, &scan, samples)?;
    }

    if let Some(ref name) = opts.output_scan {
        let scan = if opts.noise.is_some() {
            add_noise(&scan, &opts)
        } else {
            scan
        };
        scan.to_image()
            .to_gray_image()?
            .save(Path::new(name))
            .with_context(|| format!("Failed to write scan to {}", name))?;
    }

    Ok(())
}
