use nalgebra::Vector2;

/// Lens distortion applied on the normalized image plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Distortion {
    /// Ideal lens.
    #[default]
    None,
    /// One-coefficient radial polynomial.
    Radial1 {
        /// r² coefficient.
        k1: f64,
    },
    /// Three-coefficient radial polynomial.
    Radial3 {
        /// r² coefficient.
        k1: f64,
        /// r⁴ coefficient.
        k2: f64,
        /// r⁶ coefficient.
        k3: f64,
    },
    /// Brown-Conrady radial + tangential model.
    Brown {
        /// r² coefficient.
        k1: f64,
        /// r⁴ coefficient.
        k2: f64,
        /// r⁶ coefficient.
        k3: f64,
        /// First tangential coefficient.
        t1: f64,
        /// Second tangential coefficient.
        t2: f64,
    },
    /// Kannala-Brandt style polynomial in the incidence angle `atan(r)`.
    Fisheye4 {
        /// θ² coefficient.
        k1: f64,
        /// θ⁴ coefficient.
        k2: f64,
        /// θ⁶ coefficient.
        k3: f64,
        /// θ⁸ coefficient.
        k4: f64,
    },
}

impl Distortion {
    /// Map an undistorted normalized point to its distorted position.
    pub fn distort(&self, p: &Vector2<f64>) -> Vector2<f64> {
        let r2 = p.norm_squared();
        match *self {
            Self::None => *p,
            Self::Radial1 { k1 } => p * (1.0 + k1 * r2),
            Self::Radial3 { k1, k2, k3 } => p * radial3(r2, k1, k2, k3),
            Self::Brown { k1, k2, k3, t1, t2 } => {
                let (x, y) = (p.x, p.y);
                let dx = 2.0 * t1 * x * y + t2 * (r2 + 2.0 * x * x);
                let dy = t1 * (r2 + 2.0 * y * y) + 2.0 * t2 * x * y;
                p * radial3(r2, k1, k2, k3) + Vector2::new(dx, dy)
            }
            Self::Fisheye4 { k1, k2, k3, k4 } => {
                let r = r2.sqrt();
                if r < 1e-8 {
                    return *p;
                }
                let theta = r.atan();
                let t2 = theta * theta;
                let t4 = t2 * t2;
                let theta_d = theta * (1.0 + k1 * t2 + k2 * t4 + k3 * t4 * t2 + k4 * t4 * t4);
                p * (theta_d / r)
            }
        }
    }
}

fn radial3(r2: f64, k1: f64, k2: f64, k3: f64) -> f64 {
    1.0 + r2 * (k1 + r2 * (k2 + r2 * k3))
}

#[cfg(test)]
#[path = "../../tests/unit/camera/distortion.rs"]
mod tests;
