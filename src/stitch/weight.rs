//! Per-pixel contribution weights.
//!
//! A projected source pixel is either rejected (outside the image, or outside the usable
//! fisheye disc) or given a weight in `[0, 1]`. Without masking every in-bounds pixel weighs
//! `1.0`. With masking the weight is a sigmoid of the distance to the image centre that reaches
//! `0.5` at `blur_mid` and is cut off past `max_radius`.

use crate::config::opts::BlendParams;
use crate::foundation::core::Point2;

/// Descending logistic curve, `0.5` at `mid`; `width` controls the steepness.
pub fn sigmoid(x: f32, width: f32, mid: f32) -> f32 {
    1.0 / (1.0 + (10.0 * ((x - mid) / width)).exp())
}

/// Contribution weights for one source image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContributionWeighter {
    width: u32,
    height: u32,
    masking: bool,
    transition: f32,
    max_radius: f32,
    blur_mid: f32,
    center_x: f64,
    center_y: f64,
}

impl ContributionWeighter {
    /// Precompute the mask geometry of a `width x height` image.
    pub fn new(width: u32, height: u32, blend: &BlendParams) -> Self {
        let half_minor = width.min(height) as f32 * 0.5;
        let keep = 1.0 - f64::from(blend.fisheye_masking_margin);
        let max_radius = (f64::from(half_minor) * keep) as f32;
        let blur_mid = max_radius - blend.transition_size / 2.0;
        Self {
            width,
            height,
            masking: blend.fisheye_masking,
            transition: blend.transition_size,
            max_radius,
            blur_mid,
            // Integer centre, truncated for odd sizes.
            center_x: f64::from(width / 2),
            center_y: f64::from(height / 2),
        }
    }

    /// Radius beyond which masked pixels are rejected.
    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    /// Radius at which the masked weight is `0.5`.
    pub fn blur_mid(&self) -> f32 {
        self.blur_mid
    }

    /// `true` when `pix` is finite and inside `[0, width) x [0, height)`.
    pub fn in_bounds(&self, pix: &Point2<f64>) -> bool {
        pix.x.is_finite()
            && pix.y.is_finite()
            && pix.x >= 0.0
            && pix.y >= 0.0
            && pix.x < f64::from(self.width)
            && pix.y < f64::from(self.height)
    }

    /// Weight of source pixel `pix`, or `None` when it must not contribute at all.
    pub fn weight(&self, pix: &Point2<f64>) -> Option<f32> {
        if !self.in_bounds(pix) {
            return None;
        }
        if !self.masking {
            return Some(1.0);
        }
        let dx = pix.x - self.center_x;
        let dy = pix.y - self.center_y;
        let dist = (dx * dx + dy * dy).sqrt() as f32;
        if dist > self.max_radius {
            return None;
        }
        Some(sigmoid(dist, self.transition, self.blur_mid))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stitch/weight.rs"]
mod tests;
