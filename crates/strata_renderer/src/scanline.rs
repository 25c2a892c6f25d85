//! Parallel scanline rendering.
//!
//! The framebuffer is split into rows and the rows are spread over a rayon
//! pool. Each worker owns the row it is writing, so no lock guards the
//! image. Row completion is reported to a [`ProgressMonitor`] over a
//! channel; output order comes from the row's position in the buffer, not
//! from the order rows finish in.

use crate::progress::ProgressMonitor;
use crate::renderer::{encode_color, ray_color};
use crate::{Camera, Color, Framebuffer, Hittable, RenderConfig, RenderError, Rgb8};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::mpsc;
use std::time::Instant;

/// Shortest run of rows rayon may split off as one job.
///
/// This is a lower bound on the split, not a fixed batch: a job ends up
/// with anywhere from `ROW_CHUNK` to `2 * ROW_CHUNK - 1` rows, and an image
/// shorter than `2 * ROW_CHUNK` rows renders on a single worker.
pub const ROW_CHUNK: usize = 16;

/// Renders scenes with a fixed configuration.
pub struct Renderer {
    config: RenderConfig,
    camera: Camera,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;

        let camera = Camera::new(&config);
        if camera.samples_per_pixel() != config.samples_per_pixel {
            log::warn!(
                "samples_per_pixel = {} is not a perfect square, using {}",
                config.samples_per_pixel,
                camera.samples_per_pixel()
            );
        }

        Ok(Self { config, camera })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Render `world`, sampling `lights` explicitly at every diffuse bounce.
    pub fn render(&self, world: &dyn Hittable, lights: &dyn Hittable) -> Result<Framebuffer, RenderError> {
        let width = self.camera.image_width as usize;
        let height = self.camera.image_height as usize;
        let mut framebuffer = Framebuffer::new(width, height);

        log::info!(
            "Rendering {}x{} at {} spp, max depth {}",
            width,
            height,
            self.camera.samples_per_pixel(),
            self.config.max_depth
        );

        let (tx, rx) = mpsc::channel::<usize>();
        let monitor = ProgressMonitor::spawn(height, rx)?;
        let start = Instant::now();

        let render_rows = |framebuffer: &mut Framebuffer| {
            framebuffer
                .par_rows_mut()
                .enumerate()
                .with_min_len(ROW_CHUNK)
                .for_each_init(
                    || (StdRng::from_entropy(), tx.clone()),
                    |(rng, tx), (j, row)| {
                        self.render_row(j as u32, row, world, lights, rng);
                        // The monitor may already have stopped listening
                        let _ = tx.send(j);
                    },
                );
        };

        let result = if self.config.threads > 0 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .thread_name(|i| format!("strata-worker-{}", i))
                .build()
            {
                Ok(pool) => {
                    log::info!("Using {} worker threads", pool.current_num_threads());
                    pool.install(|| render_rows(&mut framebuffer));
                    Ok(())
                }
                Err(e) => Err(RenderError::ThreadPool(e)),
            }
        } else {
            log::info!("Using {} worker threads", rayon::current_num_threads());
            render_rows(&mut framebuffer);
            Ok(())
        };

        drop(tx);
        monitor.join();
        result?;

        log::info!("Render finished in {:.2?}", start.elapsed());

        if let Some(row) = framebuffer.first_incomplete_row() {
            return Err(RenderError::IncompleteFramebuffer { row });
        }
        Ok(framebuffer)
    }

    /// Average radiance over every stratum of pixel `(i, j)`.
    pub fn render_pixel(
        &self,
        i: u32,
        j: u32,
        world: &dyn Hittable,
        lights: &dyn Hittable,
        rng: &mut dyn RngCore,
    ) -> Color {
        let sqrt_spp = self.camera.sqrt_spp;
        let mut pixel_color = Color::ZERO;

        for s_j in 0..sqrt_spp {
            for s_i in 0..sqrt_spp {
                let ray = self.camera.get_ray(i, j, s_i, s_j, rng);
                pixel_color += ray_color(
                    &ray,
                    self.config.max_depth,
                    world,
                    lights,
                    self.config.background,
                    rng,
                );
            }
        }

        pixel_color * self.camera.pixel_samples_scale()
    }

    /// Render scanline `j` into a private buffer, then copy it into `slot`.
    fn render_row(
        &self,
        j: u32,
        slot: &mut [Option<Rgb8>],
        world: &dyn Hittable,
        lights: &dyn Hittable,
        rng: &mut dyn RngCore,
    ) {
        let row: Vec<Rgb8> = (0..self.camera.image_width)
            .map(|i| encode_color(self.render_pixel(i, j, world, lights, rng)))
            .collect();

        for (dst, pixel) in slot.iter_mut().zip(row) {
            *dst = Some(pixel);
        }
    }
}
