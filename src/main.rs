// Copyright 2020 TwoCookingMice

use kerrtrace::core::scene_loader::load_scene_with_settings;
use kerrtrace::integrators::kerr::KerrIntegrator;
use kerrtrace::io::write_image;
use kerrtrace::math::constants::Float;
use kerrtrace::renderers::simple::{Renderer, SimpleRenderer};

use std::env;

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <scene.xml> <output.(exr|png)> [--spp N] [--max-steps N] [--spin A] [--seed N] [--camera N]",
        program
    );
    std::process::exit(1);
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage(&args[0]);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let mut spp_override: Option<u32> = None;
    let mut max_steps_override: Option<u32> = None;
    let mut spin_override: Option<Float> = None;
    let mut seed: u64 = 0;
    let mut camera_id: usize = 0;

    let mut i = 3;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--spp" => spp_override = value.and_then(|v| v.parse::<u32>().ok()),
            "--max-steps" => max_steps_override = value.and_then(|v| v.parse::<u32>().ok()),
            "--spin" => spin_override = value.and_then(|v| v.parse::<Float>().ok()),
            "--seed" => seed = value.and_then(|v| v.parse::<u64>().ok()).unwrap_or(0),
            "--camera" => camera_id = value.and_then(|v| v.parse::<usize>().ok()).unwrap_or(0),
            other => {
                log::warn!("unknown argument {}", other);
                i += 1;
                continue;
            }
        }
        i += 2;
    }

    let load_result = match load_scene_with_settings(input_path) {
        Ok(result) => result,
        Err(e) => {
            log::error!("failed to load scene {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let mut scene = load_result.scene;
    if let Some(spin) = spin_override {
        if let Err(e) = scene.black_hole_mut().set_spin(spin) {
            log::error!("{}", e);
            std::process::exit(1);
        }
        scene.log_summary();
    }

    let mut settings = load_result.integrator_settings;
    if let Some(max_steps) = max_steps_override {
        settings.max_steps = max_steps;
    }
    let spp = spp_override.or(load_result.samples_per_pixel).unwrap_or(1).max(1);
    let integrator = Box::new(KerrIntegrator::new(settings, spp));

    let renderer = SimpleRenderer::new(integrator, camera_id, seed);
    let image = renderer.render(&mut scene);
    if let Err(e) = write_image(&image, output_path) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
