use std::{
    ops::Deref as _,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread::{self, JoinHandle},
};

use anyhow::{Context as _, anyhow};
use image::{GenericImage as _, GenericImageView as _, RgbImage};
use log::debug;

use crate::{
    camera::Camera,
    geometry::ScreenBlock,
    renderer::{RenderSettings, worker},
    scene::Scene,
    screen_block::ScreenBlockExt as _,
};

/// Number of tiles that were completed so far, out of the total.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub finished: usize,
    pub total: usize,
}

/// Starts rendering the scene on one worker thread per CPU core and returns immediately.
///
/// `started_tile_callback` and `finished_tile_callback` get called from the worker threads.
pub fn render<
    F1: Fn(ScreenBlock) + Send + Sync + 'static,
    F2: Fn(ScreenBlock, Progress) + Send + Sync + 'static,
>(
    scene: Scene,
    camera: Camera,
    settings: RenderSettings,
    started_tile_callback: F1,
    finished_tile_callback: F2,
) -> anyhow::Result<RenderProgress> {
    let resolution = camera.get_resolution();
    let tile_ordering = ScreenBlock::from_size(resolution).tile_ordering(settings.tile_size);
    debug!(
        "Rendering {:?} at {}x{} in {} tiles",
        scene.name,
        resolution.x,
        resolution.y,
        tile_ordering.len()
    );

    let state = Arc::new(RenderState {
        scene,
        camera,
        settings,

        image: Mutex::new(RgbImage::new(resolution.x, resolution.y)),

        tile_ordering,
        next_tile_index: AtomicUsize::new(0),
        finished_tiles: AtomicUsize::new(0),
    });
    let started_tile_callback = Arc::new(started_tile_callback);
    let finished_tile_callback = Arc::new(finished_tile_callback);

    let cores = core_affinity::get_core_ids()
        .ok_or_else(|| anyhow!("Could not list CPU cores"))?
        .into_iter()
        .enumerate();

    let threads = cores
        .map(|(worker_id, core)| {
            let state = Arc::clone(&state);
            let started_tile_callback = Arc::clone(&started_tile_callback);
            let finished_tile_callback = Arc::clone(&finished_tile_callback);

            thread::Builder::new()
                .name(format!("worker{worker_id}"))
                .spawn(move || {
                    core_affinity::set_for_current(core);

                    let tile_size = state.settings.tile_size.get();
                    let mut buffer = RgbImage::new(tile_size, tile_size);

                    while let Some(tile) = state.get_next_tile() {
                        (started_tile_callback)(tile.clone());

                        worker::render_tile(
                            &state.scene,
                            &state.camera,
                            &state.settings,
                            tile,
                            &mut buffer,
                        );
                        state
                            .image
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .copy_from(
                                buffer.view(0, 0, tile.width(), tile.height()).deref(),
                                tile.min.x,
                                tile.min.y,
                            )
                            .unwrap_or_else(|_| {
                                unreachable!("The buffer should always fit into the output")
                            });

                        let progress = state.finish_tile();
                        (finished_tile_callback)(tile.clone(), progress);
                    }
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .context("Spawning worker threads")?;

    Ok(RenderProgress {
        render_state: state,
        threads,
    })
}

pub struct RenderProgress {
    render_state: Arc<RenderState>,
    threads: Vec<JoinHandle<()>>,
}

impl RenderProgress {
    /// Number of finished and total tiles.
    pub fn progress(&self) -> Progress {
        Progress {
            finished: self.render_state.finished_tiles.load(Ordering::Acquire),
            total: self.render_state.tile_ordering.len(),
        }
    }

    pub fn progress_percent(&self) -> f32 {
        let Progress { finished, total } = self.progress();
        if total == 0 {
            100.0
        } else {
            100.0 * (finished as f32) / (total as f32)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.threads.iter().all(|handle| handle.is_finished())
    }

    /// Signal the workers to abort.
    /// Any running workers will still finish their tiles, but no new ones will be started.
    pub fn abort(&self) {
        self.render_state
            .next_tile_index
            .store(self.render_state.tile_ordering.len(), Ordering::Release);
    }

    /// Blocks until all workers are done.
    pub fn wait(&mut self) -> anyhow::Result<()> {
        for handle in self.threads.drain(..) {
            handle
                .join()
                .map_err(|_| anyhow!("Render worker panicked"))?;
        }
        Ok(())
    }

    pub fn image(&self) -> &Mutex<RgbImage> {
        &self.render_state.image
    }
}

struct RenderState {
    scene: Scene,
    camera: Camera,
    settings: RenderSettings,

    image: Mutex<RgbImage>,

    tile_ordering: Vec<ScreenBlock>,
    next_tile_index: AtomicUsize,
    finished_tiles: AtomicUsize,
}

impl RenderState {
    fn get_next_tile(&self) -> Option<&ScreenBlock> {
        let id = self.next_tile_index.fetch_add(1, Ordering::AcqRel);
        self.tile_ordering.get(id)
    }

    fn finish_tile(&self) -> Progress {
        Progress {
            finished: self.finished_tiles.fetch_add(1, Ordering::AcqRel) + 1,
            total: self.tile_ordering.len(),
        }
    }
}
