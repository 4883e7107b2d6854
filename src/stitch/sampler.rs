use crate::assets::decode::LinearImage;
use crate::foundation::core::Rgb;

/// Bilinear sample of `img` at continuous pixel coordinates `(x, y)`.
///
/// Neighbours falling outside the image are dropped and the remaining weights renormalized, so
/// samples in the last row or column read the edge pixels. Returns black when no neighbour is
/// inside the image.
pub fn sample_bilinear(img: &LinearImage, x: f64, y: f64) -> Rgb {
    let x0 = x.floor();
    let y0 = y.floor();
    let dx = x - x0;
    let dy = y - y0;
    let wx = [1.0 - dx, dx];
    let wy = [1.0 - dy, dy];

    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let (gx, gy) = (x0 as i64, y0 as i64);

    let mut acc = [0.0f64; 3];
    let mut total = 0.0f64;
    for (j, &ky) in wy.iter().enumerate() {
        let py = gy + j as i64;
        if py < 0 || py >= h {
            continue;
        }
        for (i, &kx) in wx.iter().enumerate() {
            let px = gx + i as i64;
            if px < 0 || px >= w {
                continue;
            }
            let k = kx * ky;
            let c = img.pixel(px as u32, py as u32);
            acc[0] += k * f64::from(c.r);
            acc[1] += k * f64::from(c.g);
            acc[2] += k * f64::from(c.b);
            total += k;
        }
    }
    if total <= 0.0 {
        return Rgb::BLACK;
    }
    Rgb::new(
        (acc[0] / total) as f32,
        (acc[1] / total) as f32,
        (acc[2] / total) as f32,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/stitch/sampler.rs"]
mod tests;
