mod machinery;
mod ray_tracer;
mod worker;

use std::num::NonZeroU32;

pub use crate::renderer::machinery::{Progress, RenderProgress, render};
pub use crate::renderer::ray_tracer::{RayTracer, TracerSettings};

const DEFAULT_TILE_SIZE: NonZeroU32 = NonZeroU32::new(32).unwrap();

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    pub tile_size: NonZeroU32,
    pub tracer: TracerSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            tile_size: DEFAULT_TILE_SIZE,
            tracer: TracerSettings::default(),
        }
    }
}
