//! Scanlines

/// Run of adjacent pixels on a single row
#[derive(Debug,Default,Clone,PartialEq)]
pub struct Span {
    /// Starting x position
    pub x: i64,
    /// Number of pixels
    pub len: i64,
    /// Coverage value of each pixel
    pub covers: Vec<u64>,
}

/// Single row of coverage values, stored as spans
#[derive(Debug,Default,Clone)]
pub struct ScanlineU8 {
    last_x: i64,
    min_x: i64,
    /// Spans, sorted by x
    pub spans: Vec<Span>,
    /// Row
    pub y: i64,
}

const LAST_X: i64 = 0x7FFF_FFF0;

impl ScanlineU8 {
    pub fn new() -> Self {
        Self { last_x: LAST_X, min_x: 0, y: 0, spans: vec![] }
    }
    /// Remove all spans, keeps the x range
    pub fn reset_spans(&mut self) {
        self.last_x = LAST_X;
        self.spans.clear();
    }
    /// Prepare for the x range `min_x` to `max_x`
    pub fn reset(&mut self, min_x: i64, _max_x: i64) {
        self.last_x = LAST_X;
        self.min_x = min_x;
        self.spans.clear();
    }
    /// Set the row of the completed scanline
    pub fn finalize(&mut self, y: i64) {
        self.y = y;
    }
    pub fn num_spans(&self) -> usize {
        self.spans.len()
    }
    /// Add `len` pixels of the same coverage starting at `x`
    pub fn add_span(&mut self, x: i64, len: i64, cover: u64) {
        if len <= 0 {
            return;
        }
        let rx = x - self.min_x;
        match self.spans.last_mut() {
            Some(cur) if rx == self.last_x + 1 => {
                cur.len += len;
                cur.covers.extend(std::iter::repeat(cover).take(len as usize));
            },
            _ => self.spans.push(Span { x, len, covers: vec![cover; len as usize] }),
        }
        self.last_x = rx + len - 1;
    }
    /// Add a single pixel with coverage `cover` at `x`
    pub fn add_cell(&mut self, x: i64, cover: u64) {
        let rx = x - self.min_x;
        match self.spans.last_mut() {
            Some(cur) if rx == self.last_x + 1 => {
                cur.len += 1;
                cur.covers.push(cover);
            },
            _ => self.spans.push(Span { x, len: 1, covers: vec![cover] }),
        }
        self.last_x = rx;
    }
}
