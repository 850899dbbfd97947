// Copyright @yucwang 2021

use crate::core::geodesic::RayOutcome;
use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;

/// Outcome histogram of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub captured: u64,
    pub escaped: u64,
    pub max_steps: u64,
}

impl RenderStats {
    pub fn record(&mut self, outcome: &RayOutcome) {
        match outcome {
            RayOutcome::Captured => self.captured += 1,
            RayOutcome::Escaped { .. } => self.escaped += 1,
            RayOutcome::MaxStepsReached => self.max_steps += 1,
            RayOutcome::Active => {}
        }
    }

    pub fn merge(&mut self, other: &RenderStats) {
        self.captured += other.captured;
        self.escaped += other.escaped;
        self.max_steps += other.max_steps;
    }

    pub fn total(&self) -> u64 {
        self.captured + self.escaped + self.max_steps
    }
}

pub trait Renderer {
    fn render(&self, scene: &mut Scene) -> Bitmap;
}
