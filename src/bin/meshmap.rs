//! Command-line front end: reads a Wavefront OBJ file and writes a grayscale
//! PNG height map of it.
//!
//! ```text
//! meshmap scene.obj                          # ~1 Mpx, writes scene.png
//! meshmap scene.obj --precision 0.05 -o top.png
//! meshmap scene.obj --pixels 250000 --hide Roof --hide Trees
//! meshmap scene.obj --list-objects
//! ```
//!
//! Logging defaults to WARN, INFO for meshmap; override with `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use tracing::{error, info};

use meshmap::mesh::MeshStore;
use meshmap::operations::export::{ExportGrayscale, ExportParams};
use meshmap::operations::import::ReadWavefront;
use meshmap::operations::raster::{
    CancelToken, ChannelProgress, GenerateHeatmap, Heatmap, RasterParams, RasterProgress,
    Resolution, DEFAULT_PIXEL_COUNT,
};
use meshmap::Result;

/// How often progress is logged while rasterizing.
const PROGRESS_PERIOD: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "meshmap", version, about = "Render a mesh as a top-down height map")]
struct Args {
    /// Wavefront OBJ file to read.
    input: PathBuf,

    /// Output PNG path. Defaults to the input path with a .png extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// World units between adjacent samples.
    #[arg(long, conflicts_with = "pixels", value_parser = parse_precision)]
    precision: Option<f64>,

    /// Approximate number of pixels in the output image.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pixels: Option<u64>,

    /// Hide an object by name (repeatable).
    #[arg(long = "hide", value_name = "NAME")]
    hidden: Vec<String>,

    /// Gray level for pixels no face covers.
    #[arg(long, default_value_t = 0)]
    background: u8,

    /// Print object names and face counts, then exit.
    #[arg(long)]
    list_objects: bool,
}

impl Args {
    fn resolution(&self) -> Resolution {
        match (self.precision, self.pixels) {
            (Some(precision), _) => Resolution::Precision(precision),
            (None, Some(pixels)) => Resolution::PixelCount(pixels),
            (None, None) => Resolution::PixelCount(DEFAULT_PIXEL_COUNT),
        }
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("png"))
    }
}

fn parse_precision(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("precision must be positive, got {s}"))
    }
}

fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("meshmap=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut store = ReadWavefront::new(&args.input).execute()?;
    info!(
        objects = store.len(),
        faces = store.face_count(),
        "loaded {}",
        args.input.display()
    );

    if args.list_objects {
        for (_, object) in store.objects() {
            println!("{}\t{} faces", object.name, object.faces.len());
        }
        return Ok(());
    }

    for name in &args.hidden {
        store.set_active_by_name(name, false)?;
    }

    let heatmap = generate_in_background(&store, args.resolution())?;
    info!(
        width = heatmap.grid.width(),
        height = heatmap.grid.height(),
        faces = heatmap.report.faces_rasterized,
        skipped = heatmap.report.faces_skipped,
        "rasterized"
    );

    let output = args.output_path();
    ExportGrayscale::new(ExportParams {
        background: args.background,
    })
    .save(&heatmap.grid, &output)?;
    info!("wrote {}", output.display());
    Ok(())
}

/// Runs the heatmap pipeline on a worker thread while this thread logs
/// progress.
fn generate_in_background(store: &MeshStore, resolution: Resolution) -> Result<Heatmap> {
    let (tx, rx) = channel::unbounded();
    thread::scope(|scope| {
        let worker = scope.spawn(move || {
            let mut sink = ChannelProgress::new(tx);
            GenerateHeatmap::new(resolution, RasterParams::default()).execute_with(
                store,
                &mut sink,
                &CancelToken::new(),
            )
        });
        log_progress(&rx);
        worker
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })
}

/// Logs the latest progress once per period until the sender hangs up.
fn log_progress(rx: &Receiver<RasterProgress>) {
    let start = Instant::now();
    let mut last_log = start;
    let mut latest = None;
    loop {
        match rx.recv_timeout(PROGRESS_PERIOD) {
            Ok(progress) => latest = Some(progress),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        if last_log.elapsed() < PROGRESS_PERIOD {
            continue;
        }
        last_log = Instant::now();
        if let Some(progress) = latest {
            let elapsed = start.elapsed();
            let percent = progress.fraction() * 100.0;
            match remaining(elapsed, progress.fraction()) {
                Some(left) => info!(
                    "progress: {percent:.1} %, elapsed: {} s, remaining: {} s",
                    elapsed.as_secs(),
                    left.as_secs()
                ),
                None => info!("progress: {percent:.1} %, elapsed: {} s", elapsed.as_secs()),
            }
        }
    }
}

/// Linear estimate of the time left, once there is something to go on.
fn remaining(elapsed: Duration, fraction: f64) -> Option<Duration> {
    if elapsed.as_secs() == 0 || fraction <= 0.0 || fraction >= 1.0 {
        return None;
    }
    Some(elapsed.mul_f64((1.0 - fraction) / fraction))
}
