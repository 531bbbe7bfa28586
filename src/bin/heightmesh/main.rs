//! heightmesh CLI - height field to triangle mesh converter.
//!
//! Usage: heightmesh [OPTIONS] -z <ZSCALE> <INPUT> <OUTPUT>
//!
//! Run `heightmesh --help` for available options.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use heightmesh::algo::base::add_base;
use heightmesh::algo::triangulate::{TriangulateOptions, Triangulator};
use heightmesh::algo::Progress;
use heightmesh::heightmap::Heightmap;
use heightmesh::io;

#[derive(Parser)]
#[command(name = "heightmesh")]
#[command(author, version, about = "Convert height fields into error-bounded triangle meshes", long_about = None)]
struct Cli {
    /// Input height field image (png, jpg, tiff, ...)
    input: PathBuf,

    /// Output mesh file (.stl or .obj)
    output: PathBuf,

    /// Z scale relative to x & y
    #[arg(short = 'z', long)]
    zscale: f32,

    /// Z exaggeration
    #[arg(short = 'x', long, default_value = "1")]
    zexagg: f32,

    /// Maximum triangulation error
    #[arg(short, long, default_value = "0.001")]
    error: f32,

    /// Maximum number of triangles (0 = no limit)
    #[arg(short, long, default_value = "0")]
    triangles: usize,

    /// Maximum number of vertices (0 = no limit)
    #[arg(short, long, default_value = "0")]
    points: usize,

    /// Solid base height (0 = no base)
    #[arg(short, long, default_value = "0")]
    base: f32,

    /// Auto level input to full grayscale range
    #[arg(long)]
    level: bool,

    /// Invert heightmap
    #[arg(long)]
    invert: bool,

    /// Gaussian blur sigma (0 = no blur)
    #[arg(long, default_value = "0")]
    blur: f32,

    /// Gamma curve exponent (0 = no curve)
    #[arg(long, default_value = "0")]
    gamma: f32,

    /// Border size in pixels (0 = no border)
    #[arg(long, default_value = "0")]
    border_size: usize,

    /// Border z height
    #[arg(long, default_value = "1")]
    border_height: f32,

    /// Path to write a normal map png
    #[arg(long)]
    normal_map: Option<PathBuf>,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,

    /// Suppress console output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print `message` and return a closure that prints the elapsed time.
fn timed(quiet: bool, message: &str) -> impl FnOnce() {
    if !quiet {
        print!("{}... ", message);
        let _ = std::io::stdout().flush();
    }
    let start = Instant::now();
    move || {
        if !quiet {
            println!("{:.3?}", start.elapsed());
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let total = Instant::now();
    let quiet = cli.quiet;

    // load heightmap
    let done = timed(quiet, "loading heightmap");
    let mut hm = Heightmap::load(&cli.input)?;
    done();

    let (w, h) = (hm.width(), hm.height());
    if !quiet {
        println!("  {} x {} = {} pixels", w, h, w * h);
    }

    // prepare heightmap
    if cli.level {
        hm.auto_level();
    }
    if cli.invert {
        hm.invert();
    }
    if cli.blur > 0.0 {
        let done = timed(quiet, "blurring heightmap");
        hm.gaussian_blur(cli.blur);
        done();
    }
    if cli.gamma > 0.0 {
        hm.gamma_curve(cli.gamma);
    }
    if cli.border_size > 0 {
        hm.add_border(cli.border_size, cli.border_height);
    }

    let z_scale = cli.zscale * cli.zexagg;

    // triangulate
    let options = TriangulateOptions::default()
        .with_max_error(cli.error)
        .with_max_triangles(cli.triangles)
        .with_max_points(cli.points)
        .with_parallel(!cli.sequential);
    let progress = if quiet { Progress::none() } else { create_progress() };

    let done = timed(quiet, "triangulating");
    let mut tri = Triangulator::new(&hm);
    tri.run_with_options(&options, &progress);
    let mut points = tri.points(z_scale);
    let mut triangles = tri.triangles();
    done();

    // add base
    if cli.base > 0.0 {
        let done = timed(quiet, "adding solid base");
        let z = -cli.base * z_scale;
        add_base(&mut points, &mut triangles, hm.width(), hm.height(), z);
        done();
    }

    // display statistics
    if !quiet {
        let naive = 2 * hm.width().saturating_sub(1) * hm.height().saturating_sub(1);
        println!("  error = {}", tri.error());
        println!("  points = {}", points.len());
        println!("  triangles = {}", triangles.len());
        if naive > 0 {
            println!("  vs. naive = {}%", 100.0 * triangles.len() as f32 / naive as f32);
        }
    }

    // write output file
    let done = timed(quiet, "writing output");
    io::save(&cli.output, &points, &triangles)?;
    done();

    // write normal map
    if let Some(path) = &cli.normal_map {
        let done = timed(quiet, "computing normal map");
        hm.save_normal_map(path, z_scale)?;
        done();
    }

    if !quiet {
        println!("{:.3?}", total.elapsed());
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Only update display if percent increased (reduce flickering)
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        // Carriage return overwrites the line
        eprint!("\r[{}{}] {:3}% {}", bar, space, raw_percent, message);
        let _ = std::io::stderr().flush();

        if raw_percent == 100 {
            eprintln!();
        }
    })
}
