// Copyright @yucwang 2026

use crate::core::emitter::Emitter;
use crate::core::geodesic_integrator::RefinementZones;
use crate::core::kerr::BlackHole;
use crate::core::sensor::Sensor;
use crate::emitters::accretion_disk::{AccretionDisk, DiskSettings};
use crate::emitters::ergosphere::{ErgosphereGlow, ErgosphereSettings};
use crate::emitters::jet::{JetSettings, RelativisticJet};
use crate::emitters::photon_ring::{PhotonRing, PhotonRingSettings};
use crate::math::constants::{Float, PI};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags(u8);

impl FeatureFlags {
    pub const NONE: Self = Self(0);
    pub const DISK: Self = Self(1 << 0);
    pub const JETS: Self = Self(1 << 1);
    pub const PHOTON_RING: Self = Self(1 << 2);
    pub const ERGOSPHERE: Self = Self(1 << 3);
    pub const DEBUG: Self = Self(1 << 4);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn set(&mut self, flag: Self, enabled: bool) {
        if enabled {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::DISK | Self::PHOTON_RING
    }
}

impl std::ops::BitOr for FeatureFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for FeatureFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Everything a frame needs. Built once, then shared read-only by every
/// worker; the renderer only borrows it mutably to check a sensor out.
pub struct Scene {
    black_hole: BlackHole,
    features: FeatureFlags,
    disk: AccretionDisk,
    jet: RelativisticJet,
    photon_ring: PhotonRing,
    ergosphere: ErgosphereGlow,
    /// Animation phase for jet knots.
    time: Float,
    sensors: Vec<Box<dyn Sensor>>,
    sky: Option<Box<dyn Emitter>>,
}

impl Scene {
    pub fn new(black_hole: BlackHole) -> Self {
        Self {
            black_hole,
            features: FeatureFlags::default(),
            disk: AccretionDisk::new(DiskSettings::default()),
            jet: RelativisticJet::new(JetSettings::default()),
            photon_ring: PhotonRing::new(PhotonRingSettings::default()),
            ergosphere: ErgosphereGlow::new(ErgosphereSettings::default()),
            time: 0.0,
            sensors: Vec::new(),
            sky: None,
        }
    }

    pub fn black_hole(&self) -> &BlackHole {
        &self.black_hole
    }

    pub fn black_hole_mut(&mut self) -> &mut BlackHole {
        &mut self.black_hole
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    pub fn set_features(&mut self, features: FeatureFlags) {
        self.features = features;
    }

    pub fn enable(&mut self, flag: FeatureFlags, enabled: bool) {
        self.features.set(flag, enabled);
    }

    pub fn is_enabled(&self, flag: FeatureFlags) -> bool {
        self.features.contains(flag)
    }

    pub fn disk(&self) -> &AccretionDisk {
        &self.disk
    }

    pub fn set_disk(&mut self, settings: DiskSettings) {
        self.disk = AccretionDisk::new(settings);
    }

    pub fn jet(&self) -> &RelativisticJet {
        &self.jet
    }

    pub fn set_jet(&mut self, settings: JetSettings) {
        self.jet = RelativisticJet::new(settings);
    }

    pub fn photon_ring(&self) -> &PhotonRing {
        &self.photon_ring
    }

    pub fn set_photon_ring(&mut self, settings: PhotonRingSettings) {
        self.photon_ring = PhotonRing::new(settings);
    }

    pub fn ergosphere(&self) -> &ErgosphereGlow {
        &self.ergosphere
    }

    pub fn set_ergosphere(&mut self, settings: ErgosphereSettings) {
        self.ergosphere = ErgosphereGlow::new(settings);
    }

    pub fn time(&self) -> Float {
        self.time
    }

    pub fn set_time(&mut self, time: Float) {
        self.time = time;
    }

    pub fn sky(&self) -> Option<&dyn Emitter> {
        self.sky.as_deref()
    }

    pub fn set_sky(&mut self, sky: Box<dyn Emitter>) {
        self.sky = Some(sky);
    }

    /// Regions where the geodesic stepper refines for enabled features.
    pub fn refinement_zones(&self) -> RefinementZones {
        let mut zones = RefinementZones::default();
        if self.is_enabled(FeatureFlags::DISK) {
            zones.disk = Some(self.disk.zone(&self.black_hole));
        }
        if self.is_enabled(FeatureFlags::JETS) && self.jet.is_active(&self.black_hole) {
            zones.jet = Some(self.jet.zone());
        }
        zones
    }

    pub fn sensors(&self) -> &Vec<Box<dyn Sensor>> {
        &self.sensors
    }

    pub fn add_sensor(&mut self, sensor: Box<dyn Sensor>) {
        self.sensors.push(sensor);
    }

    pub fn take_sensor(&mut self, camera_id: usize) -> Option<Box<dyn Sensor>> {
        if camera_id < self.sensors.len() {
            Some(self.sensors.remove(camera_id))
        } else {
            None
        }
    }

    pub fn insert_sensor(&mut self, camera_id: usize, sensor: Box<dyn Sensor>) {
        if camera_id <= self.sensors.len() {
            self.sensors.insert(camera_id, sensor);
        } else {
            self.sensors.push(sensor);
        }
    }

    pub fn camera(&self, camera_id: usize) -> Option<&dyn Sensor> {
        self.sensors.get(camera_id).map(|s| s.as_ref())
    }

    pub fn log_summary(&self) {
        let bh = &self.black_hole;
        log::info!("black hole: M = {}, a = {}", bh.mass(), bh.spin());
        log::info!(
            "  horizons r+ = {:.6}, r- = {:.6}, photon sphere = {:.6}",
            bh.event_horizon(),
            bh.inner_horizon(),
            bh.photon_sphere_radius()
        );
        log::info!(
            "  isco prograde = {:.6}, retrograde = {:.6}, ergosphere(equator) = {:.6}",
            bh.isco_radius(),
            bh.isco_radius_retrograde(),
            bh.ergosphere_radius(0.5 * PI)
        );
        if self.is_enabled(FeatureFlags::DISK) {
            log::info!(
                "  disk {:.3}..{:.3}",
                self.disk.inner_radius(bh),
                self.disk.outer_radius()
            );
        }
        if self.is_enabled(FeatureFlags::JETS) && !self.jet.is_active(bh) {
            log::warn!("jets enabled but |a|/M = {} is below the launch threshold", bh.chi());
        }
        match &self.sky {
            Some(sky) => log::info!("  sky: {}", sky.to_string()),
            None => log::info!("  sky: none"),
        }
    }
}
