// Copyright @yucwang 2026

use kerrtrace::core::integrator::Integrator;
use kerrtrace::core::rng::LcgRng;
use kerrtrace::core::scene_loader::load_scene_with_settings;
use kerrtrace::integrators::kerr::KerrIntegrator;
use kerrtrace::math::constants::{Float, Vector2f, Vector3f, PI};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <scene.xml> <x> <y> [--spp N] [--max-steps N] [--seed N] [--camera N]", args[0]);
        std::process::exit(1);
    }

    let scene_path = &args[1];
    let x: usize = args[2].parse().unwrap_or(0);
    let y: usize = args[3].parse().unwrap_or(0);

    let mut spp: Option<u32> = None;
    let mut max_steps: Option<u32> = None;
    let mut seed: u64 = 0;
    let mut camera_id: usize = 0;

    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "--spp" => {
                i += 1;
                spp = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--max-steps" => {
                i += 1;
                max_steps = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(seed);
            }
            "--camera" => {
                i += 1;
                camera_id = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(camera_id);
            }
            _ => {}
        }
        i += 1;
    }

    let load_result = match load_scene_with_settings(scene_path) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("failed to load scene: {}", e);
            std::process::exit(1);
        }
    };
    let scene = load_result.scene;
    let sensor = match scene.camera(camera_id) {
        Some(sensor) => sensor,
        None => {
            eprintln!("camera {} not found", camera_id);
            std::process::exit(1);
        }
    };
    let (width, height) = {
        let bmp = sensor.bitmap();
        (bmp.width(), bmp.height())
    };
    if x >= width || y >= height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, width, height);
        std::process::exit(2);
    }

    let mut settings = load_result.integrator_settings;
    if let Some(v) = max_steps {
        settings.max_steps = v;
    }
    let spp = spp.or(load_result.samples_per_pixel).unwrap_or(1).max(1);
    let integrator = KerrIntegrator::new(settings, spp);

    // diagnostics of the ray through the pixel center
    let center = Vector2f::new((x as Float + 0.5) / width as Float, (y as Float + 0.5) / height as Float);
    let trace = integrator.trace(&scene, &sensor.sample_ray(&center));
    let bh = scene.black_hole();
    println!("pixel ({}, {}) center ray:", x, y);
    println!("  outcome        {}", trace.outcome.label());
    println!("  color          R {:.6}, G {:.6}, B {:.6}, A {:.6}", trace.color[0], trace.color[1], trace.color[2], trace.alpha);
    println!("  steps          {}", trace.steps);
    println!("  min radius     {:.6} (horizon {:.6}, photon sphere {:.6})",
             trace.min_radius, bh.event_horizon(), bh.photon_sphere_radius());
    println!("  phi swept      {:.6} rad ({:.3} turns)", trace.total_phi_change, trace.total_phi_change.abs() / (2.0 * PI));
    println!("  disk crossings {}", trace.disk_crossings);

    let pixel = Vector2f::new(x as Float, y as Float);
    let mut rng = LcgRng::for_pixel(seed, x, y);
    let mut accum = Vector3f::zeros();
    let mut alpha = 0.0;
    for _ in 0..spp {
        let sample = integrator.trace_ray_forward(&scene, sensor, pixel, &mut rng);
        accum += sample.radiance.to_vec();
        alpha += sample.alpha;
    }
    let inv_spp = 1.0 / (spp as Float);
    let avg = accum * inv_spp;
    println!(
        "pixel ({}, {}) spp={} -> R {:.6}, G {:.6}, B {:.6}, A {:.6}",
        x, y, spp, avg.x, avg.y, avg.z, alpha * inv_spp
    );
}
