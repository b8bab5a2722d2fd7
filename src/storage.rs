//! Scanline Storage
//!
//! Rasterized scanlines are captured once and replayed many times at
//! integer offsets; used to stamp the same marker at many positions.

use smallvec::SmallVec;

use crate::scan::ScanlineU8;
use crate::scan::Span;
use crate::Color;
use crate::Rasterize;
use crate::Render;

/// Serialized scanlines
pub type ScanlineBytes = SmallVec<[u8; 512]>;

/// Single stored row
#[derive(Debug,Clone,PartialEq)]
struct StoredRow {
    y: i64,
    spans: Vec<Span>,
}

/// Renderer that records scanlines instead of drawing them
#[derive(Debug,Clone,Default)]
pub struct ScanlineStorage {
    rows: Vec<StoredRow>,
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl ScanlineStorage {
    pub fn new() -> Self {
        Self { rows: vec![],
               min_x: std::i64::MAX, min_y: std::i64::MAX,
               max_x: std::i64::MIN, max_y: std::i64::MIN }
    }
    /// Number of stored rows
    pub fn num_scanlines(&self) -> usize {
        self.rows.len()
    }
    /// Bounding box of the stored coverage, (min_x, min_y, max_x, max_y)
    ///
    /// Returns `None` if nothing was stored
    pub fn bounds(&self) -> Option<(i64,i64,i64,i64)> {
        if self.rows.is_empty() {
            None
        } else {
            Some((self.min_x, self.min_y, self.max_x, self.max_y))
        }
    }
    /// Pack the stored scanlines into bytes
    ///
    /// Layout, all little endian i32: min_x min_y max_x max_y, then for
    /// each row: y, number of spans, and for each span: x, len and `len`
    /// coverage bytes
    pub fn serialize(&self) -> ScanlineBytes {
        let mut out = ScanlineBytes::new();
        if self.rows.is_empty() {
            return out;
        }
        let put = |out: &mut ScanlineBytes, v: i64| {
            out.extend_from_slice(&(v as i32).to_le_bytes());
        };
        put(&mut out, self.min_x);
        put(&mut out, self.min_y);
        put(&mut out, self.max_x);
        put(&mut out, self.max_y);
        for row in &self.rows {
            put(&mut out, row.y);
            put(&mut out, row.spans.len() as i64);
            for span in &row.spans {
                put(&mut out, span.x);
                put(&mut out, span.len);
                out.extend(span.covers.iter().map(|&c| c.min(255) as u8));
            }
        }
        out
    }
}

impl Render for ScanlineStorage {
    fn render(&mut self, sl: &ScanlineU8) {
        let spans: Vec<Span> = sl.spans.iter()
            .filter(|s| s.len > 0)
            .cloned()
            .collect();
        if spans.is_empty() {
            return;
        }
        for s in &spans {
            self.min_x = self.min_x.min(s.x);
            self.max_x = self.max_x.max(s.x + s.len - 1);
        }
        self.min_y = self.min_y.min(sl.y);
        self.max_y = self.max_y.max(sl.y);
        self.rows.push(StoredRow { y: sl.y, spans });
    }
    fn color<C: Color>(&mut self, _color: &C) {
    }
    /// Start a new capture
    fn prepare(&mut self) {
        *self = Self::new();
    }
}

/// Replays serialized scanlines shifted by (`dx`,`dy`)
#[derive(Debug)]
pub struct SerializedScanlines<'a> {
    data: &'a [u8],
    pos: usize,
    dx: i64,
    dy: i64,
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl<'a> SerializedScanlines<'a> {
    pub fn new(data: &'a [u8], dx: i64, dy: i64) -> Self {
        Self { data, pos: 0, dx, dy,
               min_x: std::i64::MAX, min_y: std::i64::MAX,
               max_x: std::i64::MIN, max_y: std::i64::MIN }
    }
    /// Bounds after shifting, only valid after `rewind_scanlines`
    pub fn min_y(&self) -> i64 { self.min_y }
    pub fn max_y(&self) -> i64 { self.max_y }

    fn read_i32(&mut self) -> Option<i64> {
        let b = self.data.get(self.pos .. self.pos + 4)?;
        let mut v = [0u8; 4];
        v.copy_from_slice(b);
        self.pos += 4;
        Some(i64::from(i32::from_le_bytes(v)))
    }
    fn read_row(&mut self, sl: &mut ScanlineU8) -> Option<()> {
        let y = self.read_i32()?;
        let n = self.read_i32()?;
        sl.reset_spans();
        for _ in 0 .. n {
            let x = self.read_i32()?;
            let len = self.read_i32()?;
            let covers = self.data.get(self.pos .. self.pos + len as usize)?;
            self.pos += len as usize;
            for (i, &c) in covers.iter().enumerate() {
                sl.add_cell(x + self.dx + i as i64, u64::from(c));
            }
        }
        sl.finalize(y + self.dy);
        Some(())
    }
}

impl<'a> Rasterize for SerializedScanlines<'a> {
    fn rewind_scanlines(&mut self) -> bool {
        self.pos = 0;
        let header = (self.read_i32(), self.read_i32(), self.read_i32(), self.read_i32());
        match header {
            (Some(x1), Some(y1), Some(x2), Some(y2)) => {
                self.min_x = x1 + self.dx;
                self.min_y = y1 + self.dy;
                self.max_x = x2 + self.dx;
                self.max_y = y2 + self.dy;
                true
            },
            _ => false,
        }
    }
    fn sweep_scanline(&mut self, sl: &mut ScanlineU8) -> bool {
        if self.pos >= self.data.len() {
            return false;
        }
        self.read_row(sl).is_some()
    }
    fn min_x(&self) -> i64 {
        self.min_x
    }
    fn max_x(&self) -> i64 {
        self.max_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterizerScanline;
    use crate::render::render_scanlines;
    use crate::paths::Path;

    #[test]
    fn replay_with_offset() {
        let mut ras = RasterizerScanline::new();
        let mut p = Path::new();
        p.move_to(0.0, 0.0);
        p.line_to(2.0, 0.0);
        p.line_to(2.0, 1.0);
        p.line_to(0.0, 1.0);
        ras.add_path(&mut p.iter());
        let mut sl = ScanlineU8::new();
        let mut store = ScanlineStorage::new();
        render_scanlines(&mut ras, &mut sl, &mut store);
        assert_eq!(store.num_scanlines(), 1);
        assert_eq!(store.bounds(), Some((0, 0, 1, 0)));
        let bytes = store.serialize();

        let mut rep = SerializedScanlines::new(&bytes, 5, -3);
        assert!(rep.rewind_scanlines());
        assert_eq!((rep.min_x(), rep.max_x()), (5, 6));
        assert_eq!((rep.min_y(), rep.max_y()), (-3, -3));
        sl.reset(rep.min_x(), rep.max_x());
        assert!(rep.sweep_scanline(&mut sl));
        assert_eq!(sl.y, -3);
        assert_eq!(sl.spans.len(), 1);
        assert_eq!((sl.spans[0].x, sl.spans[0].len), (5, 2));
        assert_eq!(sl.spans[0].covers, vec![255, 255]);
        assert!( ! rep.sweep_scanline(&mut sl));
    }
    #[test]
    fn empty_storage() {
        let store = ScanlineStorage::new();
        let bytes = store.serialize();
        assert!(bytes.is_empty());
        let mut rep = SerializedScanlines::new(&bytes, 0, 0);
        assert!( ! rep.rewind_scanlines());
    }
}
