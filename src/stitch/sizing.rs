use crate::foundation::core::CanvasSize;
use crate::foundation::error::{PanoError, PanoResult};
use crate::scene::view::ValidView;

/// Infer the panorama canvas from the valid views, an optional forced size and a scale factor.
///
/// Without a forced size, the images are laid out side by side in the orientation of the first
/// valid view: for upright references widths add up and heights take the maximum; for rotated
/// references (EXIF 5..=8) heights add up into the width and widths take the maximum. A forced
/// size with any non-zero component yields a square of its larger component. Both dimensions
/// are multiplied by `scale_factor` and truncated.
pub fn infer_canvas_size(
    views: &[ValidView<'_>],
    forced: Option<(u32, u32)>,
    scale_factor: f32,
) -> PanoResult<CanvasSize> {
    let Some(reference) = views.first() else {
        return Err(PanoError::NoValidCameras);
    };
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        return Err(PanoError::config(format!(
            "scale factor must be finite and > 0, got {scale_factor}"
        )));
    }

    let (width, height) = match forced {
        Some((w, h)) if w > 0 || h > 0 => {
            let side = u64::from(w.max(h));
            (side, side)
        }
        _ => {
            let rotated = reference.view.orientation.is_rotated();
            views.iter().fold((0u64, 0u64), |(w, h), v| {
                let (vw, vh) = (u64::from(v.view.width), u64::from(v.view.height));
                if rotated {
                    (w + vh, h.max(vw))
                } else {
                    (w + vw, h.max(vh))
                }
            })
        }
    };

    let scaled_w = (width as f32 * scale_factor) as u32;
    let scaled_h = (height as f32 * scale_factor) as u32;
    tracing::debug!(
        base_width = width,
        base_height = height,
        scale_factor,
        width = scaled_w,
        height = scaled_h,
        "inferred panorama size"
    );
    CanvasSize::new(scaled_w, scaled_h)
}

#[cfg(test)]
#[path = "../../tests/unit/stitch/sizing.rs"]
mod tests;
