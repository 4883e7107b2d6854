use std::path::PathBuf;
use std::sync::Arc;

use crate::camera::intrinsic::IntrinsicModel;
use crate::camera::pose::CameraPose;
use crate::camera::reproject::PosedCamera;

/// EXIF orientation tag of a source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExifOrientation {
    /// Code 1 (also used for missing or unknown codes).
    #[default]
    Normal,
    /// Code 2: mirrored horizontally.
    Reversed,
    /// Code 3: rotated 180°.
    UpsideDown,
    /// Code 4: rotated 180° and mirrored.
    UpsideDownReversed,
    /// Code 5: rotated 90° to the left and mirrored.
    LeftReversed,
    /// Code 6: rotated 90° to the right.
    Right,
    /// Code 7: rotated 90° to the right and mirrored.
    RightReversed,
    /// Code 8: rotated 90° to the left.
    Left,
}

impl ExifOrientation {
    /// Decode an EXIF orientation code. Unknown codes map to [`ExifOrientation::Normal`].
    pub fn from_code(code: u32) -> Self {
        match code {
            2 => Self::Reversed,
            3 => Self::UpsideDown,
            4 => Self::UpsideDownReversed,
            5 => Self::LeftReversed,
            6 => Self::Right,
            7 => Self::RightReversed,
            8 => Self::Left,
            _ => Self::Normal,
        }
    }

    /// `true` for the portrait-via-rotation classes (left/right, with or without mirroring),
    /// where the stored width and height are swapped relative to the scene.
    pub fn is_rotated(self) -> bool {
        matches!(
            self,
            Self::Left | Self::Right | Self::LeftReversed | Self::RightReversed
        )
    }
}

/// One source image of the scene.
#[derive(Clone, Debug)]
pub struct View {
    /// Scene-unique identifier.
    pub id: u32,
    /// Location of the pixel data.
    pub image_path: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// EXIF orientation classification.
    pub orientation: ExifOrientation,
    /// Resolved pose, if any.
    pub pose: Option<CameraPose>,
    /// Resolved intrinsic model, if any.
    pub intrinsic: Option<Arc<dyn IntrinsicModel>>,
}

impl View {
    /// `true` when both pose and intrinsic are resolved.
    pub fn is_valid(&self) -> bool {
        self.pose.is_some() && self.intrinsic.is_some()
    }

    /// Borrow this view with its pose and intrinsic unwrapped, if both are resolved.
    pub fn as_valid(&self) -> Option<ValidView<'_>> {
        match (&self.pose, &self.intrinsic) {
            (Some(pose), Some(intrinsic)) => Some(ValidView {
                view: self,
                pose,
                intrinsic: intrinsic.as_ref(),
            }),
            _ => None,
        }
    }
}

/// A view known to have both pose and intrinsic.
#[derive(Clone, Copy, Debug)]
pub struct ValidView<'a> {
    /// The underlying view.
    pub view: &'a View,
    /// Its pose.
    pub pose: &'a CameraPose,
    /// Its intrinsic model.
    pub intrinsic: &'a dyn IntrinsicModel,
}

impl<'a> ValidView<'a> {
    /// Reprojection capability for this view.
    pub fn camera(&self) -> PosedCamera<'a> {
        PosedCamera::new(self.pose, self.intrinsic)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/view.rs"]
mod tests;
