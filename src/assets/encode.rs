use std::path::Path;

use image::{ExtendedColorType, ImageFormat};

use crate::assets::color::{linear_to_srgb, unit_to_u8};
use crate::foundation::error::{PanoError, PanoResult};
use crate::stitch::accumulate::Panorama;

/// Write `pano` to `path`, choosing the format from the file extension.
///
/// OpenEXR receives the linear RGBA floats untouched. Every other format gets 8-bit sRGB, with
/// alpha when the format can store it (JPEG cannot). Missing parent directories are created.
pub fn write_panorama(path: impl AsRef<Path>, pano: &Panorama) -> PanoResult<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).map_err(|e| {
        PanoError::image_write(format!("unsupported output '{}': {e}", path.display()))
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            PanoError::image_write(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }

    let (w, h) = (pano.width(), pano.height());
    let res = match format {
        ImageFormat::OpenExr => {
            let data: Vec<f32> = pano
                .pixels()
                .iter()
                .flat_map(|p| [p.r, p.g, p.b, p.a])
                .collect();
            let buf = image::Rgba32FImage::from_raw(w, h, data).ok_or_else(|| {
                PanoError::image_write("panorama buffer does not match its dimensions")
            })?;
            image::DynamicImage::ImageRgba32F(buf).save_with_format(path, format)
        }
        ImageFormat::Jpeg => image::save_buffer_with_format(
            path,
            &srgb8(pano, false),
            w,
            h,
            ExtendedColorType::Rgb8,
            format,
        ),
        _ => image::save_buffer_with_format(
            path,
            &srgb8(pano, true),
            w,
            h,
            ExtendedColorType::Rgba8,
            format,
        ),
    };
    res.map_err(|e| PanoError::image_write(format!("write '{}': {e}", path.display())))?;

    tracing::debug!(path = %path.display(), ?format, width = w, height = h, "wrote panorama");
    Ok(())
}

/// Quantize a panorama to interleaved 8-bit sRGB, RGBA or RGB.
pub(crate) fn srgb8(pano: &Panorama, with_alpha: bool) -> Vec<u8> {
    let channels = if with_alpha { 4 } else { 3 };
    let mut out = Vec::with_capacity(pano.pixels().len() * channels);
    for p in pano.pixels() {
        out.push(unit_to_u8(linear_to_srgb(p.r)));
        out.push(unit_to_u8(linear_to_srgb(p.g)));
        out.push(unit_to_u8(linear_to_srgb(p.b)));
        if with_alpha {
            out.push(unit_to_u8(p.a));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
