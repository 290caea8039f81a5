use std::path::PathBuf;

use anyhow::Context as _;
use indicatif::ProgressBar;
use log::info;
use miniray::{
    RenderSettings,
    geometry::ScreenSize,
    render,
    scene::presets::{mirrored_spheres, mirrored_spheres_camera},
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("mirrored_spheres.png"));

    let scene = mirrored_spheres()?;
    let camera = mirrored_spheres_camera(ScreenSize::new(500, 500))?;
    let settings = RenderSettings::default();

    let bar = ProgressBar::no_length();
    let mut render_progress = render(scene, camera, settings, |_| {}, {
        let bar = bar.clone();
        move |_, progress| {
            bar.set_length(progress.total as u64);
            bar.set_position(progress.finished as u64);
        }
    })?;
    bar.set_length(render_progress.progress().total as u64);

    render_progress.wait()?;
    bar.finish();

    render_progress
        .image()
        .lock()
        .map_err(|_| anyhow::anyhow!("Render output is poisoned"))?
        .save(&output)
        .with_context(|| format!("Writing {}", output.display()))?;
    info!("Saved {}", output.display());

    Ok(())
}
