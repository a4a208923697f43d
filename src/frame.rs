//! Per-frame driver: camera update, tile dispatch, stats.

use std::time::{Duration, Instant};

use crate::{
    camera::OrbitCamera,
    error::RenderError,
    pixel::{self, Bgra},
    scene::Scene,
    tiles::TileScheduler,
    tracer,
};

/// Time as seen by one frame. Passed explicitly; workers never touch it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameState {
    /// Seconds since rendering started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

impl FrameState {
    pub fn at(elapsed: f32) -> Self {
        Self { elapsed, delta: 0.0 }
    }
}

/// Monotonic clock owned by the host loop.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    previous: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        let now = Instant::now();
        Self { start: now, previous: now }
    }

    pub fn tick(&mut self) -> FrameState {
        let now = Instant::now();
        let state = FrameState {
            elapsed: now.duration_since(self.start).as_secs_f32(),
            delta: now.duration_since(self.previous).as_secs_f32(),
        };
        self.previous = now;
        state
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    pub duration: Duration,
    pub total_time: f32,
    pub pixels: u64,
    /// Reflective/refractive bounces taken across the frame.
    pub bounces: u64,
}

impl FrameStats {
    pub fn fps(&self) -> f32 {
        let secs = self.duration.as_secs_f32();
        if secs > 0.0 { 1.0 / secs } else { f32::INFINITY }
    }
}

/// Owns the immutable scene, the camera and the tile layout.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    scene: Scene,
    camera: OrbitCamera,
    scheduler: TileScheduler,
}

impl FrameDriver {
    pub fn new(scene: Scene, camera: OrbitCamera, scheduler: TileScheduler) -> Self {
        Self { scene, camera, scheduler }
    }

    pub fn scheduler(&self) -> &TileScheduler {
        &self.scheduler
    }

    pub fn pixel_count(&self) -> usize {
        self.scheduler.width() as usize * self.scheduler.height() as usize
    }

    /// Bytes a host buffer needs for one frame.
    pub fn frame_len(&self) -> usize {
        self.pixel_count() * Bgra::BYTES
    }

    /// Render into a host BGRA8 byte buffer (row-major, stride `width * 4`).
    pub fn render_frame(&self, state: &FrameState, buffer: &mut [u8]) -> Result<FrameStats, RenderError> {
        let expected = self.frame_len();
        let actual = buffer.len();
        let pixels = match pixel::as_pixels_mut(buffer) {
            Some(p) if p.len() * Bgra::BYTES == expected => p,
            _ => {
                return Err(RenderError::BufferSize {
                    width: self.scheduler.width(),
                    height: self.scheduler.height(),
                    expected,
                    actual,
                })
            }
        };
        self.render_frame_into(state, pixels)
    }

    pub fn render_frame_into(&self, state: &FrameState, pixels: &mut [Bgra]) -> Result<FrameStats, RenderError> {
        let started = Instant::now();
        let camera = self.camera.frame(state.elapsed, self.scheduler.width(), self.scheduler.height());
        let scene = &self.scene;

        let tally = self.scheduler.dispatch(pixels, |x, y, stats| {
            let (ro, rd) = camera.primary_ray(x, y);
            tracer::trace_observed(ro, rd, scene, 0, &mut |_: u32| stats.bounces += 1)
        })?;

        let stats = FrameStats {
            duration: started.elapsed(),
            total_time: state.elapsed,
            pixels: tally.pixels,
            bounces: tally.bounces,
        };
        tracing::debug!(
            elapsed = state.elapsed,
            delta = state.delta,
            pixels = stats.pixels,
            bounces = stats.bounces,
            "frame rendered in {:.2}ms",
            stats.duration.as_secs_f64() * 1000.0
        );
        Ok(stats)
    }
}
