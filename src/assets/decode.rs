use anyhow::Context as _;

use crate::assets::color::srgb_to_linear;
use crate::foundation::core::Rgb;
use crate::foundation::error::{PanoError, PanoResult};
use crate::scene::view::View;

/// Decoded source image in linear-light RGB, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl LinearImage {
    /// Wrap row-major pixels; `pixels.len()` must equal `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> PanoResult<Self> {
        if width == 0 || height == 0 {
            return Err(PanoError::image_read("image dimensions must be non-zero"));
        }
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(PanoError::image_read(format!(
                "expected {expected} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Image of a single color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> PanoResult<Self> {
        Self::new(width, height, vec![color; (width as usize) * (height as usize)])
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb) -> PanoResult<Self> {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at integer coordinates. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[(y as usize) * (self.width as usize) + (x as usize)]
    }
}

/// Decode an in-memory encoded image into linear light.
///
/// 8- and 16-bit images are treated as sRGB encoded; floating-point images (EXR, HDR) are taken
/// as already linear.
pub fn decode_image(bytes: &[u8]) -> PanoResult<LinearImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    linear_from_dynamic(dyn_img)
}

pub(crate) fn linear_from_dynamic(dyn_img: image::DynamicImage) -> PanoResult<LinearImage> {
    let is_float = matches!(
        dyn_img,
        image::DynamicImage::ImageRgb32F(_) | image::DynamicImage::ImageRgba32F(_)
    );
    let rgb = dyn_img.into_rgb32f();
    let (width, height) = rgb.dimensions();

    let pixels = rgb
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            if is_float {
                Rgb::new(r, g, b)
            } else {
                Rgb::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
            }
        })
        .collect();
    LinearImage::new(width, height, pixels)
}

/// Source of decoded pixels for each view.
pub trait ImageSource: Sync {
    /// Decode the image of `view` into linear light.
    fn read_image(&self, view: &View) -> PanoResult<LinearImage>;
}

/// Reads view images from the filesystem at [`View::image_path`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn read_image(&self, view: &View) -> PanoResult<LinearImage> {
        let path = &view.image_path;
        let dyn_img = image::open(path).map_err(|e| {
            PanoError::image_read(format!("view {} '{}': {e}", view.id, path.display()))
        })?;
        linear_from_dynamic(dyn_img)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
