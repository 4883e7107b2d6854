use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::camera::distortion::Distortion;
use crate::camera::intrinsic::{Equidistant, IntrinsicModel};
use crate::camera::pose::CameraPose;
use crate::foundation::core::{Point3, Rgb, Vector3};
use crate::scene::view::{ExifOrientation, View};

struct MapSource(HashMap<u32, LinearImage>);

impl ImageSource for MapSource {
    fn read_image(&self, view: &View) -> PanoResult<LinearImage> {
        self.0
            .get(&view.id)
            .cloned()
            .ok_or_else(|| PanoError::image_read(format!("no image for view {}", view.id)))
    }
}

fn fisheye_view(id: u32, forward: Vector3<f64>) -> View {
    let intrinsic: Arc<dyn IntrinsicModel> = Arc::new(Equidistant {
        width: 4,
        height: 4,
        focal: 1.0,
        cx: 2.0,
        cy: 2.0,
        distortion: Distortion::None,
    });
    View {
        id,
        image_path: PathBuf::from(format!("{id}.png")),
        width: 4,
        height: 4,
        orientation: ExifOrientation::Normal,
        pose: Some(CameraPose::looking_at(Point3::origin(), forward, Vector3::z()).unwrap()),
        intrinsic: Some(intrinsic),
    }
}

fn opposite_scene() -> Scene {
    Scene::new(vec![
        fisheye_view(1, Vector3::x()),
        fisheye_view(2, -Vector3::x()),
    ])
    .unwrap()
}

fn full_scale() -> StitchOpts {
    StitchOpts {
        scale_factor: 1.0,
        ..StitchOpts::default()
    }
}

#[test]
fn config_errors_come_before_scene_errors() {
    let empty = Scene::new(Vec::new()).unwrap();
    let bad = StitchOpts {
        scale_factor: -1.0,
        ..StitchOpts::default()
    };
    assert!(matches!(
        Compositor::new(&empty, bad),
        Err(PanoError::Config(_))
    ));
    assert!(matches!(
        Compositor::new(&empty, full_scale()),
        Err(PanoError::NoValidCameras)
    ));
}

#[test]
fn compositor_sizes_canvas_up_front() {
    let scene = opposite_scene();
    let c = Compositor::new(&scene, full_scale()).unwrap();
    assert_eq!((c.size().width, c.size().height), (8, 4));
    assert_eq!(c.views().len(), 2);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(matches!(build_thread_pool(Some(0)), Err(PanoError::Config(_))));
    assert_eq!(build_thread_pool(Some(2)).unwrap().current_num_threads(), 2);
}

#[test]
fn mismatched_image_size_is_a_read_failure() {
    let scene = opposite_scene();
    let views = scene.valid_views();
    let mut images = HashMap::new();
    images.insert(1, LinearImage::filled(5, 4, Rgb::BLACK).unwrap());
    let source = MapSource(images);
    assert!(matches!(
        load_view_image(&source, &views[0]),
        Err(PanoError::ImageRead(_))
    ));
}

#[test]
fn unreadable_views_are_skipped() {
    let scene = opposite_scene();
    let red = Rgb::new(1.0, 0.0, 0.0);
    let mut images = HashMap::new();
    images.insert(1, LinearImage::filled(4, 4, red).unwrap());
    let source = MapSource(images);

    let (pano, stats) = stitch_panorama_with_stats(&scene, &source, &full_scale()).unwrap();
    assert_eq!(stats.views_total, 2);
    assert_eq!(stats.views_composited, 1);
    assert_eq!(stats.views_skipped, 1);
    assert!(stats.pixels_covered > 0 && stats.pixels_covered < 32);

    // Column 0 on the equator looks along +X, straight into camera 1.
    assert_eq!(pano.pixel(0, 2).rgb(), red);
    // The centre column looks along -X, which only camera 2 sees.
    assert_eq!(pano.pixel(4, 2).a, 0.0);
}

#[test]
fn nothing_composited_is_an_error() {
    let scene = opposite_scene();
    let source = MapSource(HashMap::new());
    assert!(matches!(
        stitch_panorama(&scene, &source, &full_scale()),
        Err(PanoError::NothingComposited)
    ));
}

#[test]
fn sequential_and_parallel_runs_match() {
    let scene = Scene::new(vec![
        fisheye_view(1, Vector3::x()),
        fisheye_view(2, Vector3::y()),
        fisheye_view(3, Vector3::new(-1.0, -1.0, 0.2)),
    ])
    .unwrap();
    let mut images = HashMap::new();
    for id in 1..=3u32 {
        let img = LinearImage::from_fn(4, 4, |x, y| {
            Rgb::new(x as f32 * 0.25, y as f32 * 0.25, id as f32 / 3.0)
        })
        .unwrap();
        images.insert(id, img);
    }
    let source = MapSource(images);

    let sequential = StitchOpts {
        scale_factor: 4.0,
        parallel: false,
        ..StitchOpts::default()
    };
    let parallel = StitchOpts {
        scale_factor: 4.0,
        parallel: true,
        threads: Some(3),
        ..StitchOpts::default()
    };
    let a = stitch_panorama(&scene, &source, &sequential).unwrap();
    let b = stitch_panorama(&scene, &source, &parallel).unwrap();
    assert_eq!(a, b);
}
