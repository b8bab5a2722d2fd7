//! Exporting the canvas as raw bytes and PNG files

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use log::{debug, info};

use crate::error::Result;
use crate::renderer::RendererAgg;

impl RendererAgg {
    /// Pixels as RGB, alpha dropped
    pub fn tostring_rgb(&self) -> Vec<u8> {
        self.reorder(|p| vec![p[0], p[1], p[2]])
    }
    /// Pixels as ARGB
    pub fn tostring_argb(&self) -> Vec<u8> {
        self.reorder(|p| vec![p[3], p[0], p[1], p[2]])
    }
    /// Pixels as BGRA
    pub fn tostring_bgra(&self) -> Vec<u8> {
        self.reorder(|p| vec![p[2], p[1], p[0], p[3]])
    }
    /// The canvas, RGBA, top row first, without copying
    pub fn buffer_rgba(&self) -> &[u8] {
        self.pixf.pixeldata()
    }
    fn reorder<F: Fn(&[u8]) -> Vec<u8>>(&self, f: F) -> Vec<u8> {
        self.buffer_rgba().chunks(4).flat_map(|p| f(p)).collect()
    }
    /// Smallest rectangle holding every pixel with a non zero alpha
    ///
    /// Returns (x, y, width, height) in device pixels, or None if every
    /// pixel is transparent
    pub fn get_content_extents(&self) -> Option<(usize, usize, usize, usize)> {
        let (w, h) = (self.width(), self.height());
        let mut r : Option<(usize, usize, usize, usize)> = None;
        for (i, p) in self.buffer_rgba().chunks(4).enumerate() {
            if p[3] == 0 {
                continue;
            }
            let (x, y) = (i % w, i / w);
            r = Some(match r {
                None => (x, y, x, y),
                Some((x1, y1, x2, y2)) => (x1.min(x), y1.min(y), x2.max(x), y2.max(y)),
            });
        }
        r.map(|(x1, y1, x2, y2)| (x1, y1, (x2 + 1).min(w) - x1, (y2 + 1).min(h) - y1))
    }
    /// RGBA pixels inside [`get_content_extents`](#method.get_content_extents)
    ///
    /// Returns the pixels and (x, y, width, height); an empty canvas gives
    /// no pixels and a zero rectangle
    pub fn tostring_rgba_minimized(&self) -> (Vec<u8>, (usize, usize, usize, usize)) {
        let (x, y, w, h) = match self.get_content_extents() {
            Some(r) => r,
            None => return (vec![], (0, 0, 0, 0)),
        };
        let stride = self.width() * 4;
        let data = self.buffer_rgba();
        let mut out = Vec::with_capacity(w * h * 4);
        for row in y .. y + h {
            let start = row * stride + x * 4;
            out.extend_from_slice(&data[start .. start + w * 4]);
        }
        debug!("minimized to {}x{} at ({}, {})", w, h, x, y);
        (out, (x, y, w, h))
    }
    /// Encode the canvas as PNG into `out`
    pub fn write_png_to<W: Write>(&self, out: W) -> Result<()> {
        let enc = PngEncoder::new(out);
        enc.write_image(self.buffer_rgba(), self.width() as u32, self.height() as u32,
                        ColorType::Rgba8)?;
        Ok(())
    }
    /// Write the canvas to a PNG file
    pub fn write_png<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        let file = File::create(filename.as_ref())?;
        let mut out = BufWriter::new(file);
        self.write_png_to(&mut out)?;
        out.flush()?;
        info!("wrote {}", filename.as_ref().display());
        Ok(())
    }
}

/// Read an image file as RGBA, returns the pixels, width and height
pub fn read_png<P: AsRef<Path>>(filename: P) -> Result<(Vec<u8>, usize, usize)> {
    let img = image::open(filename)?.to_rgba8();
    let (w, h) = img.dimensions();
    Ok((img.into_raw(), w as usize, h as usize))
}

/// Compare two image files pixel by pixel
///
/// Differences are logged at debug level
pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> Result<bool> {
    let (d1, w1, h1) = read_png(f1)?;
    let (d2, w2, h2) = read_png(f2)?;
    if w1 != w2 || h1 != h2 {
        debug!("image sizes differ: {}x{} and {}x{}", w1, h1, w2, h2);
        return Ok(false);
    }
    let mut same = true;
    for (i, (v1, v2)) in d1.iter().zip(d2.iter()).enumerate() {
        if v1 != v2 {
            debug!("{} [{},{},{}]: {} {}", i, (i / 4) % w1, (i / 4) / w1, i % 4, v1, v2);
            same = false;
        }
    }
    Ok(same)
}

#[cfg(test)]
mod tests {
    use crate::color::Rgba;
    use crate::gc::GraphicsContext;
    use crate::paths::Path;
    use crate::renderer::RendererAgg;
    use crate::transform::Transform;

    #[test]
    fn byte_orders() {
        let mut ren = RendererAgg::new(2, 1, 72.0).unwrap();
        ren.clear_to(Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(ren.tostring_rgb(), vec![255, 0, 0, 255, 0, 0]);
        assert_eq!(&ren.tostring_argb()[..4], &[255, 255, 0, 0]);
        assert_eq!(&ren.tostring_bgra()[..4], &[0, 0, 255, 255]);
        assert_eq!(ren.buffer_rgba().len(), 8);
    }
    #[test]
    fn minimized() {
        let mut ren = RendererAgg::new(10, 10, 72.0).unwrap();
        assert_eq!(ren.get_content_extents(), None);
        assert_eq!(ren.tostring_rgba_minimized(), (vec![], (0, 0, 0, 0)));

        let mut gc = GraphicsContext::new();
        gc.linewidth = 0.0;
        let p = Path::polygon(&[(2.0, 1.0), (5.0, 1.0), (5.0, 3.0), (2.0, 3.0)]);
        ren.draw_path(&gc, &p, &Transform::new(), Some(Rgba::black())).unwrap();
        // User rows 1..3 are device rows 7..9
        assert_eq!(ren.get_content_extents(), Some((2, 7, 3, 2)));
        let (data, r) = ren.tostring_rgba_minimized();
        assert_eq!(r, (2, 7, 3, 2));
        assert_eq!(data.len(), 3 * 2 * 4);
        assert!(data.chunks(4).all(|p| p == [0, 0, 0, 255]));
    }
}
