use crate::config::opts::AlphaMode;
use crate::foundation::core::{CanvasSize, Rgb, Rgba};

/// Pixels whose accumulated weight is at or below this value are treated as uncovered.
pub const WEIGHT_EPSILON: f32 = 1e-4;

/// Running weighted sum of one canvas pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Accum {
    /// Sum of `color * weight`.
    pub color: Rgb,
    /// Sum of weights.
    pub weight: f32,
}

impl Accum {
    /// Add a weighted sample.
    pub fn deposit(&mut self, color: Rgb, weight: f32) {
        debug_assert!(weight > 0.0, "deposit weight must be positive");
        self.color = self.color.plus(color.scaled(weight));
        self.weight += weight;
    }

    fn is_covered(&self) -> bool {
        self.weight > WEIGHT_EPSILON
    }
}

/// Working canvas: a row-major grid of [`Accum`] cells, all zero at creation.
#[derive(Clone, Debug)]
pub struct AccumulationCanvas {
    size: CanvasSize,
    cells: Vec<Accum>,
}

impl AccumulationCanvas {
    /// Allocate a zeroed canvas.
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            cells: vec![Accum::default(); size.pixel_count()],
        }
    }

    /// Canvas dimensions.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Accumulated state of pixel `(x, y)`.
    pub fn cell(&self, x: u32, y: u32) -> Accum {
        self.cells[self.index(x, y)]
    }

    /// Add `color` with `weight` to pixel `(x, y)`.
    pub fn deposit(&mut self, x: u32, y: u32, color: Rgb, weight: f32) {
        let i = self.index(x, y);
        self.cells[i].deposit(color, weight);
    }

    /// Number of pixels with weight above [`WEIGHT_EPSILON`].
    pub fn covered_pixels(&self) -> u64 {
        self.cells.iter().filter(|c| c.is_covered()).count() as u64
    }

    /// Row-major cell storage, for row-partitioned compositing.
    pub(crate) fn cells_mut(&mut self) -> &mut [Accum] {
        &mut self.cells
    }

    /// Divide every covered pixel by its weight. Uncovered pixels become transparent black.
    ///
    /// Consumes the canvas, so a panorama is normalized exactly once.
    pub fn normalize(self, alpha: AlphaMode) -> Panorama {
        let pixels = self
            .cells
            .iter()
            .map(|c| {
                if !c.is_covered() {
                    return Rgba::TRANSPARENT;
                }
                let a = match alpha {
                    AlphaMode::Weight => c.weight,
                    AlphaMode::Coverage => 1.0,
                };
                Rgba::new(
                    c.color.r / c.weight,
                    c.color.g / c.weight,
                    c.color.b / c.weight,
                    a,
                )
            })
            .collect();
        Panorama {
            size: self.size,
            pixels,
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.size.width && y < self.size.height);
        y as usize * self.size.width as usize + x as usize
    }
}

/// Normalized equirectangular panorama in linear light.
#[derive(Clone, Debug, PartialEq)]
pub struct Panorama {
    size: CanvasSize,
    pixels: Vec<Rgba>,
}

impl Panorama {
    /// Panorama dimensions.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[y as usize * self.size.width as usize + x as usize]
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stitch/accumulate.rs"]
mod tests;
