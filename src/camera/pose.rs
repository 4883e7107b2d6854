use crate::foundation::core::{Point3, Rotation3, Vector3};
use crate::foundation::error::{PanoError, PanoResult};

/// Rigid camera pose.
///
/// `rotation` maps world directions into the camera frame (+X right, +Y down, +Z forward) and
/// `center` is the optical centre in world coordinates, so a world point `X` lands at
/// `rotation * (X - center)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// World-to-camera rotation.
    pub rotation: Rotation3<f64>,
    /// Camera centre in world coordinates.
    pub center: Point3<f64>,
}

impl CameraPose {
    /// Build a pose from its parts.
    pub fn new(rotation: Rotation3<f64>, center: Point3<f64>) -> Self {
        Self { rotation, center }
    }

    /// Pose at the origin looking down world +Z.
    pub fn identity() -> Self {
        Self::new(Rotation3::identity(), Point3::origin())
    }

    /// Pose at `center` whose optical axis points along `forward`, with image "up" towards `up`.
    pub fn looking_at(
        center: Point3<f64>,
        forward: Vector3<f64>,
        up: Vector3<f64>,
    ) -> PanoResult<Self> {
        let z = forward
            .try_normalize(1e-12)
            .ok_or_else(|| PanoError::config("camera forward direction must be non-zero"))?;
        let x = z
            .cross(&up)
            .try_normalize(1e-12)
            .ok_or_else(|| PanoError::config("camera up direction must not be parallel to forward"))?;
        let y = z.cross(&x);
        let m = nalgebra::Matrix3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]);
        Ok(Self::new(Rotation3::from_matrix_unchecked(m), center))
    }

    /// Express a world point in the camera frame.
    pub fn transform(&self, p: &Point3<f64>) -> Vector3<f64> {
        self.rotation * (p - self.center)
    }

    /// Signed distance of `p` along the optical axis; negative behind the camera.
    pub fn depth(&self, p: &Point3<f64>) -> f64 {
        self.transform(p).z
    }
}

#[cfg(test)]
#[path = "../../tests/unit/camera/pose.rs"]
mod tests;
