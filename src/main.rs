use std::{collections::TryReserveError, env, error::Error, process::ExitCode};

use indicatif::{style::TemplateError, ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use whitted::{
    config::RenderSettings,
    pixel::{self, Bgra},
    ConfigError, FrameClock, FrameDriver, RenderError,
};

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("bad progress bar template")]
    Progress(#[from] TemplateError),
    #[error("cannot allocate the frame buffer")]
    FrameBuffer(#[from] TryReserveError),
}

struct Args {
    config: Option<String>,
    frames: Option<u32>,
    quiet: bool,
}

fn parse_args() -> Result<Args, AppError> {
    let mut args = Args { config: None, frames: None, quiet: false };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--quiet" | "-q" => args.quiet = true,
            "--config" | "-c" => {
                args.config = Some(it.next().ok_or_else(|| AppError::Usage("--config needs a path".into()))?);
            }
            "--frames" | "-n" => {
                let n = it.next().ok_or_else(|| AppError::Usage("--frames needs a count".into()))?;
                let n = n.parse().map_err(|_| AppError::Usage(format!("bad frame count '{n}'")))?;
                args.frames = Some(n);
            }
            other => return Err(AppError::Usage(format!("unknown argument '{other}'"))),
        }
    }
    Ok(args)
}

fn progress_style() -> Result<ProgressStyle, TemplateError> {
    ProgressStyle::default_bar().template("{bar:40.cyan/blue} {pos}/{len} frames | {elapsed_precise} | {msg}")
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            let mut source = e.source();
            while let Some(cause) = source {
                tracing::error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let args = parse_args()?;

    let mut settings = match &args.config {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };
    if let Some(frames) = args.frames {
        settings.frames = frames;
    }

    if let Some(threads) = settings.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(RenderError::from)?;
    }

    let scene = settings.scene.build();
    let spheres = scene.len();
    let lights = scene.lights().count();
    let driver = FrameDriver::new(scene, settings.orbit_camera(), settings.scheduler()?);
    tracing::info!(
        width = settings.width,
        height = settings.height,
        tiles = driver.scheduler().tiles().len(),
        spheres,
        lights,
        threads = rayon::current_num_threads(),
        "starting render"
    );

    let bar = if !args.quiet {
        let pb = ProgressBar::new(settings.frames as u64);
        pb.set_style(progress_style()?);
        Some(pb)
    } else {
        None
    };

    let mut pixels = Vec::new();
    pixels.try_reserve_exact(driver.pixel_count())?;
    pixels.resize(driver.pixel_count(), Bgra::default());
    let mut clock = FrameClock::start();
    let mut busy = 0.0f64;

    for _ in 0..settings.frames {
        let state = clock.tick();
        let stats = driver.render_frame_into(&state, &mut pixels)?;
        busy += stats.duration.as_secs_f64();

        tracing::debug!(
            "RenderDuration: {:.2}ms; FPS: {:.0}; TotalTime: {:.3}sec",
            stats.duration.as_secs_f64() * 1000.0,
            stats.fps(),
            stats.total_time
        );
        if let Some(b) = &bar {
            b.set_message(format!("{:.0} fps", stats.fps()));
            b.inc(1);
        }
    }

    if let Some(b) = bar {
        b.finish_with_message("done");
    }

    let checksum = pixel::as_bytes(&pixels)
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_mul(31).wrapping_add(b as u64));
    let avg_fps = if busy > 0.0 { settings.frames as f64 / busy } else { 0.0 };
    tracing::info!(frames = settings.frames, checksum, "average {avg_fps:.1} fps");
    Ok(())
}
