use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::camera::distortion::Distortion;
use crate::camera::intrinsic::{IntrinsicModel, Pinhole};
use crate::camera::pose::CameraPose;
use crate::scene::view::{ExifOrientation, View};

fn view(id: u32, width: u32, height: u32, orientation: ExifOrientation) -> View {
    let intrinsic: Arc<dyn IntrinsicModel> = Arc::new(Pinhole {
        width,
        height,
        fx: 50.0,
        fy: 50.0,
        cx: f64::from(width) / 2.0,
        cy: f64::from(height) / 2.0,
        distortion: Distortion::None,
    });
    View {
        id,
        image_path: PathBuf::from(format!("{id}.png")),
        width,
        height,
        orientation,
        pose: Some(CameraPose::identity()),
        intrinsic: Some(intrinsic),
    }
}

fn valid(views: &[View]) -> Vec<ValidView<'_>> {
    views.iter().filter_map(View::as_valid).collect()
}

#[test]
fn upright_views_are_laid_side_by_side() {
    let views: Vec<View> = (0..3)
        .map(|i| view(i, 100, 50, ExifOrientation::Normal))
        .collect();
    let v = valid(&views);

    let s = infer_canvas_size(&v, None, 1.0).unwrap();
    assert_eq!((s.width, s.height), (300, 50));

    let s = infer_canvas_size(&v, None, 0.5).unwrap();
    assert_eq!((s.width, s.height), (150, 25));
}

#[test]
fn rotated_reference_swaps_axes() {
    let views = vec![
        view(0, 100, 50, ExifOrientation::Right),
        view(1, 100, 60, ExifOrientation::Normal),
    ];
    let s = infer_canvas_size(&valid(&views), None, 1.0).unwrap();
    assert_eq!((s.width, s.height), (110, 100));
}

#[test]
fn only_the_first_view_decides_orientation() {
    let views = vec![
        view(0, 100, 50, ExifOrientation::Normal),
        view(1, 100, 50, ExifOrientation::Left),
    ];
    let s = infer_canvas_size(&valid(&views), None, 1.0).unwrap();
    assert_eq!((s.width, s.height), (200, 50));
}

#[test]
fn forced_size_becomes_square() {
    let views = vec![view(0, 100, 50, ExifOrientation::Normal)];
    let v = valid(&views);

    let s = infer_canvas_size(&v, Some((400, 300)), 1.0).unwrap();
    assert_eq!((s.width, s.height), (400, 400));

    let s = infer_canvas_size(&v, Some((0, 64)), 0.5).unwrap();
    assert_eq!((s.width, s.height), (32, 32));

    // (0, 0) means "not forced".
    let s = infer_canvas_size(&v, Some((0, 0)), 1.0).unwrap();
    assert_eq!((s.width, s.height), (100, 50));
}

#[test]
fn scaling_truncates() {
    let views = vec![view(0, 99, 33, ExifOrientation::Normal)];
    let s = infer_canvas_size(&valid(&views), None, 0.5).unwrap();
    assert_eq!((s.width, s.height), (49, 16));
}

#[test]
fn empty_scene_and_degenerate_scale_fail() {
    assert!(matches!(
        infer_canvas_size(&[], None, 1.0),
        Err(PanoError::NoValidCameras)
    ));

    let views = vec![view(0, 10, 10, ExifOrientation::Normal)];
    let v = valid(&views);
    assert!(matches!(
        infer_canvas_size(&v, None, 0.0),
        Err(PanoError::Config(_))
    ));
    // 10 * 0.01 truncates to zero.
    assert!(matches!(
        infer_canvas_size(&v, None, 0.01),
        Err(PanoError::Config(_))
    ));
}
