pub(crate) mod distortion;
pub(crate) mod intrinsic;
pub(crate) mod pose;
pub(crate) mod reproject;
