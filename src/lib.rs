//! panostitch composites calibrated camera views into one equirectangular 360° panorama.
//!
//! Every canvas pixel is mapped to a direction on the unit sphere, projected into each posed
//! camera, and the samples that land inside a camera's image are blended with a per-pixel
//! weighted average:
//!
//! - Load a [`Scene`] (SfMData-style JSON) with its poses and intrinsics
//! - Configure a run with [`StitchOpts`]
//! - Call [`stitch_panorama`] (or drive a [`Compositor`]) with an [`ImageSource`]
//! - Save the [`Panorama`] with [`write_panorama`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod assets;
pub(crate) mod camera;
pub(crate) mod config;
pub(crate) mod scene;
pub(crate) mod stitch;

pub use crate::foundation::core::{CanvasSize, Point2, Point3, Rgb, Rgba, Rotation3, Vector3};
pub use crate::foundation::error::{PanoError, PanoResult};

pub use crate::assets::color::{linear_to_srgb, srgb_to_linear};
pub use crate::assets::decode::{FsImageSource, ImageSource, LinearImage, decode_image};
pub use crate::assets::encode::write_panorama;
pub use crate::camera::distortion::Distortion;
pub use crate::camera::intrinsic::{
    Equidistant, IntrinsicKind, IntrinsicModel, IntrinsicParams, Pinhole, build_intrinsic,
};
pub use crate::camera::pose::CameraPose;
pub use crate::camera::reproject::PosedCamera;
pub use crate::config::opts::{AlphaMode, BlendParams, StitchOpts};
pub use crate::scene::load::Scene;
pub use crate::scene::view::{ExifOrientation, ValidView, View};
pub use crate::stitch::accumulate::{Accum, AccumulationCanvas, Panorama, WEIGHT_EPSILON};
pub use crate::stitch::compositor::{
    Compositor, StitchStats, stitch_panorama, stitch_panorama_with_stats,
};
pub use crate::stitch::sampler::sample_bilinear;
pub use crate::stitch::sizing::infer_canvas_size;
pub use crate::stitch::spherical::{canvas_to_ray, latitude, longitude};
pub use crate::stitch::weight::{ContributionWeighter, sigmoid};
