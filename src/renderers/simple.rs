// Copyright @yucwang 2021

use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector4f};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

pub use super::renderer::{RenderStats, Renderer};

struct Tile {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    pixels: Vec<Vector4f>,
    stats: RenderStats,
}

/// Tiles the film into blocks handed out to worker threads through an
/// atomic counter. Every pixel seeds its own RNG, so the image does not
/// depend on scheduling.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    camera_id: usize,
    seed: u64,
    block_size: usize,
    show_progress: bool,
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &mut Scene) -> Bitmap {
        self.render_with_stats(scene).0
    }
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, camera_id: usize, seed: u64) -> Self {
        Self {
            integrator,
            camera_id,
            seed,
            block_size: 32,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn render_with_stats(&self, scene: &mut Scene) -> (Bitmap, RenderStats) {
        let mut sensor = match scene.take_sensor(self.camera_id) {
            Some(sensor) => sensor,
            None => {
                log::warn!("scene has no camera {}", self.camera_id);
                return (Bitmap::new(0, 0), RenderStats::default());
            }
        };

        let (width, height) = {
            let bmp = sensor.bitmap();
            (bmp.width(), bmp.height())
        };
        if width == 0 || height == 0 {
            scene.insert_sensor(self.camera_id, sensor);
            return (Bitmap::new(0, 0), RenderStats::default());
        }
        let spp = match self.integrator.samples_per_pixel() {
            0 => 1,
            v => v,
        };
        let inv_spp = 1.0 / (spp as Float);

        let block_size = self.block_size;
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;
        let scene_ref: &Scene = scene;
        let sensor_ref: &dyn crate::core::sensor::Sensor = sensor.as_ref();
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();
        let seed = self.seed;

        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        log::info!(
            "rendering {} with {}x{} pixels, {} spp, {} threads",
            sensor_ref.describe(), width, height, spp, thread_count
        );

        let progress = if self.show_progress {
            ProgressBar::new(total_blocks as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel::<Tile>();
        let mut output = vec![Vector4f::zeros(); width * height];
        let mut stats = RenderStats::default();

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * block_size;
                        let y0 = by * block_size;
                        let x1 = (x0 + block_size).min(width);
                        let y1 = (y0 + block_size).min(height);

                        let mut tile = Tile {
                            x0, y0, x1, y1,
                            pixels: vec![Vector4f::zeros(); (x1 - x0) * (y1 - y0)],
                            stats: RenderStats::default(),
                        };
                        for y in y0..y1 {
                            for x in x0..x1 {
                                let mut rgba = Vector4f::zeros();
                                let pixel = Vector2f::new(x as Float, y as Float);
                                let mut rng = LcgRng::for_pixel(seed, x, y);
                                for _sample in 0..spp {
                                    let sample = integrator_ref.trace_ray_forward(scene_ref, sensor_ref, pixel, &mut rng);
                                    let c = sample.radiance;
                                    rgba += Vector4f::new(c[0], c[1], c[2], sample.alpha);
                                    tile.stats.record(&sample.outcome);
                                }
                                tile.pixels[(x - x0) + (x1 - x0) * (y - y0)] = rgba * inv_spp;
                            }
                        }
                        if tx.send(tile).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_blocks {
                if let Ok(tile) = rx.recv() {
                    for y in tile.y0..tile.y1 {
                        for x in tile.x0..tile.x1 {
                            output[x + width * y] = tile.pixels[(x - tile.x0) + (tile.x1 - tile.x0) * (y - tile.y0)];
                        }
                    }
                    stats.merge(&tile.stats);
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        log::info!(
            "ray outcomes: {} captured, {} escaped, {} max steps ({} total)",
            stats.captured, stats.escaped, stats.max_steps, stats.total()
        );
        if stats.max_steps > 0 {
            log::warn!("{} rays ran out of steps; raise max_steps for a converged image", stats.max_steps);
        }

        let bitmap = sensor.bitmap_mut();
        for y in 0..height {
            for x in 0..width {
                bitmap[(x, y)] = output[x + width * y];
            }
        }
        let bitmap = bitmap.clone();
        scene.insert_sensor(self.camera_id, sensor);
        (bitmap, stats)
    }
}
