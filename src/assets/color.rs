/// Decode an sRGB-encoded channel in `[0, 1]` to linear light.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode a linear-light channel to sRGB, clamping to `[0, 1]` first.
pub fn linear_to_srgb(c: f32) -> f32 {
    let c = if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 };
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Quantize a `[0, 1]` value to 8 bits.
pub(crate) fn unit_to_u8(c: f32) -> u8 {
    let c = if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 };
    (c * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
