use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nalgebra::Matrix3;

use crate::camera::intrinsic::{IntrinsicModel, IntrinsicParams, build_intrinsic};
use crate::camera::pose::CameraPose;
use crate::foundation::core::{Point3, Rotation3};
use crate::foundation::error::{PanoError, PanoResult};
use crate::scene::model::{IntrinsicDef, Num, PoseDef, SceneDef, UNDEFINED_INDEX, ViewDef};
use crate::scene::view::{ExifOrientation, ValidView, View};

const ROTATION_TOLERANCE: f64 = 1e-6;
const ORIENTATION_KEYS: [&str; 3] = ["Orientation", "Exif:Orientation", "orientation"];

/// The set of views to composite.
///
/// Views are kept in ascending id order; the first valid view is the orientation reference used
/// for canvas sizing.
#[derive(Clone, Debug)]
pub struct Scene {
    views: Vec<View>,
}

impl Scene {
    /// Build a scene from already-resolved views. View ids must be unique.
    pub fn new(mut views: Vec<View>) -> PanoResult<Self> {
        views.sort_by_key(|v| v.id);
        if let Some(w) = views.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(PanoError::scene_load(format!("duplicate view id {}", w[0].id)));
        }
        Ok(Self { views })
    }

    /// Load an SfMData-style JSON scene from disk.
    ///
    /// Relative image paths are resolved against the directory containing `path`.
    pub fn from_path(path: impl AsRef<Path>) -> PanoResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PanoError::scene_load(format!("open scene '{}': {e}", path.display()))
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_reader(BufReader::new(f), base_dir)
    }

    /// Parse an SfMData-style JSON scene; relative image paths are joined onto `base_dir`.
    pub fn from_reader<R: std::io::Read>(r: R, base_dir: &Path) -> PanoResult<Self> {
        let def: SceneDef = serde_json::from_reader(r)
            .map_err(|e| PanoError::scene_load(format!("parse scene JSON: {e}")))?;
        Self::from_def(def, base_dir)
    }

    /// All views, valid or not.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Views with both pose and intrinsic resolved, in id order.
    pub fn valid_views(&self) -> Vec<ValidView<'_>> {
        self.views.iter().filter_map(View::as_valid).collect()
    }

    fn from_def(def: SceneDef, base_dir: &Path) -> PanoResult<Self> {
        let intrinsics = resolve_intrinsics(&def.intrinsics)?;
        let poses = resolve_poses(&def.poses)?;

        let mut views = Vec::with_capacity(def.views.len());
        for v in &def.views {
            views.push(resolve_view(v, base_dir, &intrinsics, &poses)?);
        }
        let scene = Self::new(views)?;

        let valid = scene.views.iter().filter(|v| v.is_valid()).count();
        tracing::debug!(
            views = scene.views.len(),
            valid,
            intrinsics = intrinsics.len(),
            poses = poses.len(),
            "scene resolved"
        );
        Ok(scene)
    }
}

fn field<T>(r: Result<T, String>) -> PanoResult<T> {
    r.map_err(PanoError::scene_load)
}

fn resolve_intrinsics(defs: &[IntrinsicDef]) -> PanoResult<BTreeMap<u32, Arc<dyn IntrinsicModel>>> {
    let mut out = BTreeMap::new();
    for d in defs {
        let id = field(d.intrinsic_id.as_u32("intrinsicId"))?;
        let params = IntrinsicParams {
            kind: d.kind,
            width: field(d.width.as_u32("intrinsic width"))?,
            height: field(d.height.as_u32("intrinsic height"))?,
            focal: d.px_focal_length.fx_fy(),
            principal_point: (d.principal_point[0].as_f64(), d.principal_point[1].as_f64()),
            distortion: d.distortion_params.iter().map(|n| n.as_f64()).collect(),
        };
        let model = build_intrinsic(&params)
            .map_err(|e| PanoError::scene_load(format!("intrinsic {id}: {e}")))?;
        if out.insert(id, model).is_some() {
            return Err(PanoError::scene_load(format!("duplicate intrinsic id {id}")));
        }
    }
    Ok(out)
}

fn resolve_poses(defs: &[PoseDef]) -> PanoResult<BTreeMap<u32, CameraPose>> {
    let mut out = BTreeMap::new();
    for d in defs {
        let id = field(d.pose_id.as_u32("poseId"))?;
        let pose = pose_from_def(d).map_err(|e| PanoError::scene_load(format!("pose {id}: {e}")))?;
        if out.insert(id, pose).is_some() {
            return Err(PanoError::scene_load(format!("duplicate pose id {id}")));
        }
    }
    Ok(out)
}

fn pose_from_def(d: &PoseDef) -> Result<CameraPose, String> {
    let t = &d.pose.transform;
    let rotation: Vec<f64> = t.rotation.iter().map(|n| n.as_f64()).collect();
    let center: Vec<f64> = t.center.iter().map(|n| n.as_f64()).collect();
    if rotation.len() != 9 {
        return Err(format!("rotation needs 9 values, got {}", rotation.len()));
    }
    if center.len() != 3 {
        return Err(format!("center needs 3 values, got {}", center.len()));
    }
    if rotation.iter().chain(center.iter()).any(|v| !v.is_finite()) {
        return Err("pose values must be finite".to_owned());
    }

    let m = Matrix3::from_column_slice(&rotation);
    let orthonormal = (m * m.transpose() - Matrix3::identity()).amax() < ROTATION_TOLERANCE;
    if !orthonormal || (m.determinant() - 1.0).abs() > ROTATION_TOLERANCE {
        return Err("rotation is not a proper orthonormal matrix".to_owned());
    }

    Ok(CameraPose::new(
        Rotation3::from_matrix_unchecked(m),
        Point3::new(center[0], center[1], center[2]),
    ))
}

fn resolve_view(
    d: &ViewDef,
    base_dir: &Path,
    intrinsics: &BTreeMap<u32, Arc<dyn IntrinsicModel>>,
    poses: &BTreeMap<u32, CameraPose>,
) -> PanoResult<View> {
    let id = field(d.view_id.as_u32("viewId"))?;
    let width = field(d.width.as_u32("view width"))?;
    let height = field(d.height.as_u32("view height"))?;
    if width == 0 || height == 0 {
        return Err(PanoError::scene_load(format!(
            "view {id}: image size must be non-zero, got {width}x{height}"
        )));
    }
    if d.path.is_empty() {
        return Err(PanoError::scene_load(format!("view {id}: empty image path")));
    }

    let pose_id = field(d.pose_id.as_u32("poseId"))?;
    let intrinsic_id = field(d.intrinsic_id.as_u32("intrinsicId"))?;
    let pose = lookup(poses, pose_id).copied();
    let intrinsic = lookup(intrinsics, intrinsic_id).cloned();
    if pose.is_none() || intrinsic.is_none() {
        tracing::debug!(view = id, pose_id, intrinsic_id, "view is not fully resolved");
    }

    Ok(View {
        id,
        image_path: resolve_image_path(base_dir, &d.path),
        width,
        height,
        orientation: orientation_from_metadata(&d.metadata),
        pose,
        intrinsic,
    })
}

fn lookup<T>(map: &BTreeMap<u32, T>, id: u32) -> Option<&T> {
    if id == UNDEFINED_INDEX {
        return None;
    }
    map.get(&id)
}

fn resolve_image_path(base_dir: &Path, raw: &str) -> PathBuf {
    let p = Path::new(raw);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn orientation_from_metadata(metadata: &BTreeMap<String, serde_json::Value>) -> ExifOrientation {
    ORIENTATION_KEYS
        .iter()
        .find_map(|k| metadata.get(*k))
        .and_then(|v| serde_json::from_value::<Num>(v.clone()).ok())
        .and_then(|n| n.as_u32("orientation").ok())
        .map(ExifOrientation::from_code)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/load.rs"]
mod tests;
