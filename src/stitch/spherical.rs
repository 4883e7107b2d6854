//! Equirectangular canvas <-> sphere mapping.
//!
//! Convention: column `x` maps to longitude `2π (x - width) / width`, which covers `[-2π, 0)`
//! across the canvas. Column 0 looks along world +X and the centre column along world -X. Row 0
//! is the north pole (+Z), row `height / 2` the equator.

use std::f64::consts::PI;

use crate::foundation::core::{CanvasSize, Vector3};

/// Longitude in radians of canvas column `x`.
pub fn longitude(x: f64, width: u32) -> f64 {
    let w = f64::from(width);
    PI * 2.0 * (x - w) / w
}

/// Latitude in radians of canvas row `y`.
pub fn latitude(y: f64, height: u32) -> f64 {
    let h = f64::from(height);
    PI * (h / 2.0 - y) / h
}

/// Unit direction for canvas pixel `(x, y)`.
pub fn canvas_to_ray(x: f64, y: f64, width: u32, height: u32) -> Vector3<f64> {
    let lon = longitude(x, width);
    let lat = latitude(y, height);
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Per-column and per-row trigonometry of a canvas, so that rays of integer pixels are built
/// with two multiplications. Rays are bit-identical to [`canvas_to_ray`].
#[derive(Clone, Debug)]
pub(crate) struct RayGrid {
    cos_lon: Vec<f64>,
    sin_lon: Vec<f64>,
    cos_lat: Vec<f64>,
    sin_lat: Vec<f64>,
}

impl RayGrid {
    pub(crate) fn new(size: CanvasSize) -> Self {
        let (cos_lon, sin_lon) = (0..size.width)
            .map(|x| {
                let lon = longitude(f64::from(x), size.width);
                (lon.cos(), lon.sin())
            })
            .unzip();
        let (cos_lat, sin_lat) = (0..size.height)
            .map(|y| {
                let lat = latitude(f64::from(y), size.height);
                (lat.cos(), lat.sin())
            })
            .unzip();
        Self {
            cos_lon,
            sin_lon,
            cos_lat,
            sin_lat,
        }
    }

    pub(crate) fn ray(&self, x: usize, y: usize) -> Vector3<f64> {
        let cl = self.cos_lat[y];
        Vector3::new(cl * self.cos_lon[x], cl * self.sin_lon[x], self.sin_lat[y])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stitch/spherical.rs"]
mod tests;
