//! Render loop.
//!
//! Scanlines are independent: each one owns its own seeded RNG and writes a
//! disjoint row of the image, so the serial and the rayon-parallel paths
//! produce identical pixels for the same seed.

use crate::output::ImageBuffer;
use crate::{Camera, Color, Hittable};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Errors that can end a render early.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Render cancelled after {completed} of {total} scanlines")]
    Cancelled { completed: u32, total: u32 },
}

/// Shared flag used to stop a render from another thread.
///
/// Checked once per scanline; a scanline in flight always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Render options that do not affect the camera model.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Base seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// Render scanlines on the rayon thread pool.
    pub parallel: bool,
    /// Optional cancellation flag.
    pub cancel: Option<CancelToken>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            seed: None,
            parallel: true,
            cancel: None,
        }
    }
}

impl RenderOptions {
    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

/// RNG for one scanline, derived from the render seed.
fn scanline_rng(seed: u64, row: u32) -> StdRng {
    StdRng::seed_from_u64(seed ^ u64::from(row).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Render a single pixel: average `samples_per_pixel` jittered rays.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += camera.ray_color(&ray, world, 0, rng);
    }

    pixel_color * camera.pixel_samples_scale()
}

/// Render one row of the image, left to right.
pub fn render_scanline(
    camera: &Camera,
    world: &dyn Hittable,
    y: u32,
    rng: &mut dyn RngCore,
) -> Vec<Color> {
    (0..camera.image_width())
        .map(|x| render_pixel(camera, world, x, y, rng))
        .collect()
}

/// Render the entire scene to an image buffer.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    options: &RenderOptions,
) -> Result<ImageBuffer, RenderError> {
    let width = camera.image_width();
    let height = camera.image_height();
    let seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {} ({})",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth(),
        if options.parallel { "parallel" } else { "serial" }
    );
    let start = Instant::now();

    let completed = AtomicU32::new(0);
    let trace_row = |y: u32| -> Result<Vec<Color>, RenderError> {
        if options.is_cancelled() {
            return Err(RenderError::Cancelled {
                completed: completed.load(Ordering::Relaxed),
                total: height,
            });
        }

        let row = render_scanline(camera, world, y, &mut scanline_rng(seed, y));

        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("Scanlines remaining: {}", height - done);
        Ok(row)
    };

    let rows: Vec<Vec<Color>> = if options.parallel {
        (0..height).into_par_iter().map(trace_row).collect::<Result<_, _>>()?
    } else {
        (0..height).map(trace_row).collect::<Result<_, _>>()?
    };

    let mut image = ImageBuffer::new(width, height);
    for (y, row) in (0..height).zip(rows) {
        for (x, color) in (0..width).zip(row) {
            image.set(x, y, color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
