//! Intrinsic camera models.
//!
//! Every model follows the same pipeline, implemented once in [`IntrinsicModel::project`]:
//!
//! ```text
//! world point -> pose -> camera frame -> normalized plane -> distortion -> pixel
//! ```
//!
//! Pixel coordinates have their origin at the top-left corner of the top-left pixel, +X right
//! and +Y down.

use std::fmt;
use std::sync::Arc;

use nalgebra::Vector2;

use crate::camera::distortion::Distortion;
use crate::camera::pose::CameraPose;
use crate::foundation::core::{Point2, Point3, Vector3};
use crate::foundation::error::{PanoError, PanoResult};

/// Projection capability shared by every intrinsic family.
pub trait IntrinsicModel: Send + Sync + fmt::Debug {
    /// Calibrated image width in pixels.
    fn width(&self) -> u32;

    /// Calibrated image height in pixels.
    fn height(&self) -> u32;

    /// Map a camera-frame point onto the undistorted normalized image plane.
    fn cam_to_normalized(&self, p_c: &Vector3<f64>) -> Vector2<f64>;

    /// Lens distortion of this camera.
    fn distortion(&self) -> &Distortion;

    /// Map a (distorted) normalized point to pixel coordinates.
    fn normalized_to_pixel(&self, n: &Vector2<f64>) -> Point2<f64>;

    /// Project a world point through `pose` into this camera's pixel space.
    ///
    /// Points on or behind the image plane may produce non-finite coordinates; callers test
    /// depth first.
    fn project(&self, pose: &CameraPose, p: &Point3<f64>, apply_distortion: bool) -> Point2<f64> {
        let p_c = pose.transform(p);
        let n = self.cam_to_normalized(&p_c);
        let n = if apply_distortion {
            self.distortion().distort(&n)
        } else {
            n
        };
        self.normalized_to_pixel(&n)
    }
}

/// Rectilinear (pinhole) camera with optional lens distortion.
#[derive(Clone, Debug, PartialEq)]
pub struct Pinhole {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Horizontal focal length in pixels.
    pub fx: f64,
    /// Vertical focal length in pixels.
    pub fy: f64,
    /// Principal point, x.
    pub cx: f64,
    /// Principal point, y.
    pub cy: f64,
    /// Lens distortion.
    pub distortion: Distortion,
}

impl IntrinsicModel for Pinhole {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn cam_to_normalized(&self, p_c: &Vector3<f64>) -> Vector2<f64> {
        Vector2::new(p_c.x / p_c.z, p_c.y / p_c.z)
    }

    fn distortion(&self) -> &Distortion {
        &self.distortion
    }

    fn normalized_to_pixel(&self, n: &Vector2<f64>) -> Point2<f64> {
        Point2::new(self.fx * n.x + self.cx, self.fy * n.y + self.cy)
    }
}

/// Equidistant fisheye: image radius is proportional to the incidence angle.
#[derive(Clone, Debug, PartialEq)]
pub struct Equidistant {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixels per radian of incidence angle.
    pub focal: f64,
    /// Principal point, x.
    pub cx: f64,
    /// Principal point, y.
    pub cy: f64,
    /// Radial polynomial applied to the angle (`None` or `Radial3`).
    pub distortion: Distortion,
}

impl IntrinsicModel for Equidistant {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn cam_to_normalized(&self, p_c: &Vector3<f64>) -> Vector2<f64> {
        let rho = (p_c.x * p_c.x + p_c.y * p_c.y).sqrt();
        if rho < 1e-12 {
            return Vector2::zeros();
        }
        let theta = rho.atan2(p_c.z);
        Vector2::new(p_c.x, p_c.y) * (theta / rho)
    }

    fn distortion(&self) -> &Distortion {
        &self.distortion
    }

    fn normalized_to_pixel(&self, n: &Vector2<f64>) -> Point2<f64> {
        Point2::new(self.focal * n.x + self.cx, self.focal * n.y + self.cy)
    }
}

/// Intrinsic family names as written in scene files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntrinsicKind {
    /// Pinhole without distortion.
    Pinhole,
    /// Pinhole + `k1`.
    Radial1,
    /// Pinhole + `k1 k2 k3`.
    Radial3,
    /// Pinhole + `k1 k2 k3 t1 t2`.
    Brown,
    /// Pinhole + angle polynomial `k1 k2 k3 k4`.
    Fisheye4,
    /// Equidistant fisheye without distortion.
    Equidistant,
    /// Equidistant fisheye + `k1 k2 k3` on the angle.
    EquidistantR3,
}

impl IntrinsicKind {
    /// Number of entries expected in `distortionParams`.
    pub fn distortion_param_count(self) -> usize {
        match self {
            Self::Pinhole | Self::Equidistant => 0,
            Self::Radial1 => 1,
            Self::Radial3 | Self::EquidistantR3 => 3,
            Self::Fisheye4 => 4,
            Self::Brown => 5,
        }
    }
}

/// Raw calibration values used to build an [`IntrinsicModel`].
#[derive(Clone, Debug, PartialEq)]
pub struct IntrinsicParams {
    /// Family.
    pub kind: IntrinsicKind,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// `(fx, fy)` in pixels. Equidistant models use `fx` as pixels per radian.
    pub focal: (f64, f64),
    /// Principal point in absolute pixels.
    pub principal_point: (f64, f64),
    /// Distortion coefficients, in the order listed on [`IntrinsicKind`].
    pub distortion: Vec<f64>,
}

/// Validate `params` and build the matching model.
pub fn build_intrinsic(params: &IntrinsicParams) -> PanoResult<Arc<dyn IntrinsicModel>> {
    let IntrinsicParams {
        kind,
        width,
        height,
        focal: (fx, fy),
        principal_point: (cx, cy),
        ref distortion,
    } = *params;

    if width == 0 || height == 0 {
        return Err(PanoError::scene_load(format!(
            "intrinsic image size must be non-zero, got {width}x{height}"
        )));
    }
    if !(fx.is_finite() && fy.is_finite()) || fx <= 0.0 || fy <= 0.0 {
        return Err(PanoError::scene_load(format!(
            "focal length must be finite and > 0, got ({fx}, {fy})"
        )));
    }
    if !(cx.is_finite() && cy.is_finite()) {
        return Err(PanoError::scene_load("principal point must be finite"));
    }
    let expected = kind.distortion_param_count();
    if distortion.len() != expected {
        return Err(PanoError::scene_load(format!(
            "intrinsic type {kind:?} expects {expected} distortion parameters, got {}",
            distortion.len()
        )));
    }
    if distortion.iter().any(|k| !k.is_finite()) {
        return Err(PanoError::scene_load("distortion parameters must be finite"));
    }

    let d = distortion.as_slice();
    let lens = match kind {
        IntrinsicKind::Pinhole | IntrinsicKind::Equidistant => Distortion::None,
        IntrinsicKind::Radial1 => Distortion::Radial1 { k1: d[0] },
        IntrinsicKind::Radial3 | IntrinsicKind::EquidistantR3 => Distortion::Radial3 {
            k1: d[0],
            k2: d[1],
            k3: d[2],
        },
        IntrinsicKind::Brown => Distortion::Brown {
            k1: d[0],
            k2: d[1],
            k3: d[2],
            t1: d[3],
            t2: d[4],
        },
        IntrinsicKind::Fisheye4 => Distortion::Fisheye4 {
            k1: d[0],
            k2: d[1],
            k3: d[2],
            k4: d[3],
        },
    };

    Ok(match kind {
        IntrinsicKind::Equidistant | IntrinsicKind::EquidistantR3 => Arc::new(Equidistant {
            width,
            height,
            focal: fx,
            cx,
            cy,
            distortion: lens,
        }),
        _ => Arc::new(Pinhole {
            width,
            height,
            fx,
            fy,
            cx,
            cy,
            distortion: lens,
        }),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/camera/intrinsic.rs"]
mod tests;
