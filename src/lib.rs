mod camera;
pub mod color;
pub mod geometry;
pub mod lighting;
pub mod material;
mod renderer;
pub mod scene;
mod screen_block;
pub mod shape;

pub use crate::renderer::{
    Progress, RayTracer, RenderProgress, RenderSettings, TracerSettings, render,
};
pub use camera::Camera;
pub use scene::Scene;
