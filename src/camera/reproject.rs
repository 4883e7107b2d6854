use crate::camera::intrinsic::IntrinsicModel;
use crate::camera::pose::CameraPose;
use crate::foundation::core::{Point2, Point3, Vector3};

/// A pose paired with its intrinsic model: the only camera view the compositor needs.
#[derive(Clone, Copy, Debug)]
pub struct PosedCamera<'a> {
    /// Camera pose.
    pub pose: &'a CameraPose,
    /// Projection model.
    pub intrinsic: &'a dyn IntrinsicModel,
}

impl<'a> PosedCamera<'a> {
    /// Pair a pose with an intrinsic model.
    pub fn new(pose: &'a CameraPose, intrinsic: &'a dyn IntrinsicModel) -> Self {
        Self { pose, intrinsic }
    }

    /// Signed depth of the point at `ray` (unit direction from the world origin).
    pub fn ray_depth(&self, ray: &Vector3<f64>) -> f64 {
        self.pose.depth(&Point3::from(*ray))
    }

    /// Project the point at `ray` into distorted pixel coordinates.
    pub fn project(&self, ray: &Vector3<f64>) -> Point2<f64> {
        self.intrinsic.project(self.pose, &Point3::from(*ray), true)
    }
}
