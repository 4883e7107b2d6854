//! Per-view compositing loop.
//!
//! Views are composited one after another in scene order. Within a view, canvas rows are
//! partitioned across the rayon pool and each worker owns its rows, so no locking is needed and
//! every pixel receives its deposits in the same order whatever the thread count. The image of
//! the next view is decoded with `rayon::join` while the current one is composited.

use rayon::prelude::*;

use crate::assets::decode::{ImageSource, LinearImage};
use crate::camera::reproject::PosedCamera;
use crate::config::opts::{BlendParams, StitchOpts};
use crate::foundation::core::CanvasSize;
use crate::foundation::error::{PanoError, PanoResult};
use crate::scene::load::Scene;
use crate::scene::view::ValidView;
use crate::stitch::accumulate::{Accum, AccumulationCanvas, Panorama};
use crate::stitch::sampler::sample_bilinear;
use crate::stitch::sizing::infer_canvas_size;
use crate::stitch::spherical::RayGrid;
use crate::stitch::weight::ContributionWeighter;

/// Statistics of one stitching run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StitchStats {
    /// Valid views considered.
    pub views_total: u64,
    /// Views whose image was decoded and composited.
    pub views_composited: u64,
    /// Views skipped because their image could not be read.
    pub views_skipped: u64,
    /// Canvas pixels covered by at least one view.
    pub pixels_covered: u64,
}

/// A validated, sized stitching run over the valid views of a scene.
///
/// Construction front-loads option validation and canvas sizing, so configuration errors
/// surface before any pixel memory is allocated.
#[derive(Debug)]
pub struct Compositor<'a> {
    views: Vec<ValidView<'a>>,
    size: CanvasSize,
    opts: StitchOpts,
}

impl<'a> Compositor<'a> {
    /// Validate `opts` and size the canvas for `scene`.
    pub fn new(scene: &'a Scene, opts: StitchOpts) -> PanoResult<Self> {
        opts.validate()?;
        let views = scene.valid_views();
        if views.is_empty() {
            return Err(PanoError::NoValidCameras);
        }
        let size = infer_canvas_size(&views, opts.panorama_size, opts.scale_factor)?;
        Ok(Self { views, size, opts })
    }

    /// Output canvas dimensions.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Valid views, in compositing order.
    pub fn views(&self) -> &[ValidView<'a>] {
        &self.views
    }

    /// Composite every view and normalize the canvas.
    ///
    /// Views whose image cannot be read are skipped with a warning. Fails with
    /// [`PanoError::NothingComposited`] when every view was skipped.
    #[tracing::instrument(skip_all, fields(width = self.size.width, height = self.size.height))]
    pub fn run(&self, source: &dyn ImageSource) -> PanoResult<(Panorama, StitchStats)> {
        let Some(first) = self.views.first() else {
            return Err(PanoError::NoValidCameras);
        };
        tracing::info!(
            views = self.views.len(),
            width = self.size.width,
            height = self.size.height,
            parallel = self.opts.parallel,
            "stitching panorama"
        );

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };
        let pool = pool.as_ref();
        let parallel = pool.is_some();

        let grid = RayGrid::new(self.size);
        let mut canvas = AccumulationCanvas::new(self.size);
        let mut stats = StitchStats {
            views_total: self.views.len() as u64,
            ..StitchStats::default()
        };

        let mut current = run_in(pool, || load_view_image(source, first));
        for (i, view) in self.views.iter().enumerate() {
            let next_view = self.views.get(i + 1);
            let (next, deposits) = join_in(
                pool,
                || next_view.map(|v| load_view_image(source, v)),
                || {
                    current.as_ref().ok().map(|img| {
                        composite_view(&mut canvas, &grid, view, img, &self.opts.blend, parallel)
                    })
                },
            );

            match (&current, deposits) {
                (Ok(_), Some(deposits)) => {
                    stats.views_composited += 1;
                    tracing::info!(view = view.view.id, deposits, "composited view");
                }
                (Err(e), _) => {
                    stats.views_skipped += 1;
                    tracing::warn!(view = view.view.id, error = %e, "skipping view");
                }
                (Ok(_), None) => {}
            }

            let Some(next) = next else { break };
            current = next;
        }

        if stats.views_composited == 0 {
            return Err(PanoError::NothingComposited);
        }

        stats.pixels_covered = canvas.covered_pixels();
        let panorama = canvas.normalize(self.opts.alpha);
        tracing::info!(
            composited = stats.views_composited,
            skipped = stats.views_skipped,
            covered = stats.pixels_covered,
            "panorama normalized"
        );
        Ok((panorama, stats))
    }
}

/// Stitch the valid views of `scene` into a normalized panorama.
pub fn stitch_panorama(
    scene: &Scene,
    source: &dyn ImageSource,
    opts: &StitchOpts,
) -> PanoResult<Panorama> {
    stitch_panorama_with_stats(scene, source, opts).map(|(pano, _)| pano)
}

/// Like [`stitch_panorama`], also returning run statistics.
pub fn stitch_panorama_with_stats(
    scene: &Scene,
    source: &dyn ImageSource,
    opts: &StitchOpts,
) -> PanoResult<(Panorama, StitchStats)> {
    Compositor::new(scene, opts.clone())?.run(source)
}

fn load_view_image(source: &dyn ImageSource, view: &ValidView<'_>) -> PanoResult<LinearImage> {
    let img = source.read_image(view.view)?;
    let (w, h) = (view.view.width, view.view.height);
    if img.width() != w || img.height() != h {
        return Err(PanoError::image_read(format!(
            "view {}: decoded image is {}x{}, scene declares {w}x{h}",
            view.view.id,
            img.width(),
            img.height()
        )));
    }
    Ok(img)
}

fn composite_view(
    canvas: &mut AccumulationCanvas,
    grid: &RayGrid,
    view: &ValidView<'_>,
    img: &LinearImage,
    blend: &BlendParams,
    parallel: bool,
) -> u64 {
    let camera = view.camera();
    let weighter = ContributionWeighter::new(img.width(), img.height(), blend);
    let width = canvas.size().width as usize;
    let rows = canvas.cells_mut();
    let row = |(y, cells): (usize, &mut [Accum])| {
        composite_row(cells, y, grid, &camera, &weighter, img)
    };
    if parallel {
        rows.par_chunks_mut(width).enumerate().map(row).sum()
    } else {
        rows.chunks_mut(width).enumerate().map(row).sum()
    }
}

fn composite_row(
    cells: &mut [Accum],
    y: usize,
    grid: &RayGrid,
    camera: &PosedCamera<'_>,
    weighter: &ContributionWeighter,
    img: &LinearImage,
) -> u64 {
    let mut deposits = 0;
    for (x, cell) in cells.iter_mut().enumerate() {
        let ray = grid.ray(x, y);
        if camera.ray_depth(&ray) < 0.0 {
            continue;
        }
        let pix = camera.project(&ray);
        let Some(weight) = weighter.weight(&pix) else {
            continue;
        };
        if weight <= 0.0 {
            continue;
        }
        cell.deposit(sample_bilinear(img, pix.x, pix.y), weight);
        deposits += 1;
    }
    deposits
}

fn run_in<R: Send>(pool: Option<&rayon::ThreadPool>, f: impl FnOnce() -> R + Send) -> R {
    match pool {
        Some(pool) => pool.install(f),
        None => f(),
    }
}

fn join_in<A, B, RA, RB>(pool: Option<&rayon::ThreadPool>, a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    match pool {
        Some(pool) => pool.install(|| rayon::join(a, b)),
        None => (a(), b()),
    }
}

fn build_thread_pool(threads: Option<usize>) -> PanoResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PanoError::config("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PanoError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/stitch/compositor.rs"]
mod tests;
