use crate::foundation::error::{PanoError, PanoResult};

/// How the alpha channel of the normalized panorama is filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaMode {
    /// Keep the accumulated contribution weight (useful to inspect overlaps).
    #[default]
    Weight,
    /// `1.0` where at least one camera contributed, `0.0` elsewhere.
    Coverage,
}

/// Per-run blending parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlendParams {
    /// Skip the dark border of circular fisheye images.
    pub fisheye_masking: bool,
    /// Fraction of the minor image dimension excluded at the border, in `[0, 1)`.
    pub fisheye_masking_margin: f32,
    /// Width in pixels of the smooth falloff band, `> 0`.
    pub transition_size: f32,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            fisheye_masking: false,
            fisheye_masking_margin: 0.05,
            transition_size: 10.0,
        }
    }
}

impl BlendParams {
    /// Reject out-of-range parameters.
    pub fn validate(&self) -> PanoResult<()> {
        let m = self.fisheye_masking_margin;
        if !m.is_finite() || !(0.0..1.0).contains(&m) {
            return Err(PanoError::config(format!(
                "fisheye masking margin must be in [0, 1), got {m}"
            )));
        }
        let t = self.transition_size;
        if !t.is_finite() || t <= 0.0 {
            return Err(PanoError::config(format!(
                "transition size must be finite and > 0, got {t}"
            )));
        }
        Ok(())
    }
}

/// Options for one stitching run.
#[derive(Clone, Debug, PartialEq)]
pub struct StitchOpts {
    /// Multiplier applied to the inferred (or forced) canvas size, `> 0`.
    pub scale_factor: f32,
    /// Forced output size. Any non-zero component switches to a square canvas of side
    /// `max(width, height)` before scaling.
    pub panorama_size: Option<(u32, u32)>,
    /// Blending parameters.
    pub blend: BlendParams,
    /// Alpha channel content after normalization.
    pub alpha: AlphaMode,
    /// Partition canvas rows across a rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for StitchOpts {
    fn default() -> Self {
        Self {
            scale_factor: 0.2,
            panorama_size: None,
            blend: BlendParams::default(),
            alpha: AlphaMode::Weight,
            parallel: true,
            threads: None,
        }
    }
}

impl StitchOpts {
    /// Validate every option. Called before the canvas is sized or allocated.
    pub fn validate(&self) -> PanoResult<()> {
        let s = self.scale_factor;
        if !s.is_finite() || s <= 0.0 {
            return Err(PanoError::config(format!(
                "scale factor must be finite and > 0, got {s}"
            )));
        }
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(PanoError::config("'threads' must be >= 1 when set"));
        }
        self.blend.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/opts.rs"]
mod tests;
