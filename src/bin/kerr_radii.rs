// Copyright @yucwang 2026

use kerrtrace::core::kerr::BlackHole;
use kerrtrace::emitters::accretion_disk::{AccretionDisk, DiskSettings};
use kerrtrace::math::constants::{Float, PI};
use std::env;

fn parse_arg(args: &[String], index: usize, name: &str) -> Option<Float> {
    let raw = args.get(index)?;
    match raw.parse::<Float>() {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("invalid {}: {}", name, raw);
            std::process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <mass> <spin> [radius] [temperature_scale]", args[0]);
        std::process::exit(1);
    }

    let mass = parse_arg(&args, 1, "mass").unwrap_or(1.0);
    let spin = parse_arg(&args, 2, "spin").unwrap_or(0.0);
    let bh = match BlackHole::new(mass, spin) {
        Ok(bh) => bh,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    println!("M = {}, a = {}, a/M = {:.6}", bh.mass(), bh.spin(), bh.spin() / bh.mass());
    println!("event horizon        {:.10}", bh.event_horizon());
    println!("inner horizon        {:.10}", bh.inner_horizon());
    println!("isco prograde        {:.10}", bh.isco_radius());
    println!("isco retrograde      {:.10}", bh.isco_radius_retrograde());
    println!("photon sphere        {:.10}", bh.photon_sphere_radius());
    println!("ergosphere pole      {:.10}", bh.ergosphere_radius(0.0));
    println!("ergosphere equator   {:.10}", bh.ergosphere_radius(0.5 * PI));

    let r = match parse_arg(&args, 3, "radius") {
        Some(r) => r,
        None => return,
    };
    let temperature_scale = parse_arg(&args, 4, "temperature_scale").unwrap_or(DiskSettings::default().temperature_scale);
    let disk = AccretionDisk::new(DiskSettings { temperature_scale, ..DiskSettings::default() });
    let equator = 0.5 * PI;
    println!("at r = {} on the equator:", r);
    println!("  frame dragging     {:.10}", bh.frame_dragging_omega(r, equator));
    println!("  redshift factor    {:.10}", bh.gravitational_redshift(r, equator));
    println!("  inside ergosphere  {}", bh.is_inside_ergosphere(r, equator));
    println!("  disk temperature   {:.4} K", disk.temperature(&bh, r));
    println!("  orbital velocity   {:.10}", disk.orbital_velocity(&bh, r));
    println!("  doppler approach   {:.10}", disk.doppler_factor(&bh, r, 0.0));
    println!("  doppler recede     {:.10}", disk.doppler_factor(&bh, r, PI));
}
