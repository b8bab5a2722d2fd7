//! Clipping Region

use crate::cell::RasterizerCell;

/// Rectangle
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Rectangle<T: std::cmp::PartialOrd + Copy> {
    /// Minimum x value
    pub x1: T,
    /// Minimum y value
    pub y1: T,
    /// Maximum x value
    pub x2: T,
    /// Maximum y value
    pub y2: T,
}
impl<T> Rectangle<T> where T: std::cmp::PartialOrd + Copy {
    /// Create a new Rectangle
    ///
    /// Values are sorted before storing
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        let (x1, x2) = if x1 > x2 { (x2,x1) } else { (x1,x2) };
        let (y1, y2) = if y1 > y2 { (y2,y1) } else { (y1,y2) };
        Self { x1,y1,x2,y2 }
    }
    /// Get location of point relative to rectangle
    ///
    /// Returned is an a u8 made up of the following bits:
    /// - [INSIDE](constant.INSIDE.html)
    /// - [LEFT](constant.LEFT.html)
    /// - [RIGHT](constant.RIGHT.html)
    /// - [BOTTOM](constant.BOTTOM.html)
    /// - [TOP](constant.TOP.html)
    ///
    pub fn clip_flags(&self, x: T, y: T) -> u8 {
        clip_flags(&x,&y, &self.x1, &self.y1, &self.x2, &self.y2)
    }
    /// Location of a y value relative to the rectangle, TOP or BOTTOM
    pub fn clip_flags_y(&self, y: T) -> u8 {
        let mut code = INSIDE;
        if y > self.y2 { code |= TOP; }
        if y < self.y1 { code |= BOTTOM; }
        code
    }
    /// Expand if the point (x,y) is outside
    pub fn expand(&mut self, x: T, y: T) {
        if x < self.x1 { self.x1 = x; }
        if x > self.x2 { self.x2 = x; }
        if y < self.y1 { self.y1 = y; }
        if y > self.y2 { self.y2 = y; }
    }
}

/// Inside Region
///
/// See https://en.wikipedia.org/wiki/Liang-Barsky_algorithm
pub const INSIDE : u8 = 0b0000;
/// Right of Region, x > x2
pub const RIGHT  : u8 = 0b0000_0001;
/// Above Region, y > y2
pub const TOP    : u8 = 0b0000_0010;
/// Left of Region, x < x1
pub const LEFT   : u8 = 0b0000_0100;
/// Below Region, y < y1
pub const BOTTOM : u8 = 0b0000_1000;

/// Determine the location of a point to a broken-down rectangle or range
fn clip_flags<T: std::cmp::PartialOrd>(x: &T, y: &T, x1: &T, y1: &T, x2: &T, y2: &T) -> u8 {
    let mut code = INSIDE;
    if x < x1 { code |= LEFT; }
    if x > x2 { code |= RIGHT; }
    if y < y1 { code |= BOTTOM; }
    if y > y2 { code |= TOP; }
    code
}

/// Move a clipped end point onto the clip box
///
/// Returns false if the segment is degenerate along the clipped axis
fn clip_move_point(x1: f64, y1: f64, x2: f64, y2: f64,
                   b: &Rectangle<f64>, x: &mut f64, y: &mut f64, flags: u8) -> bool {
    if flags & (LEFT|RIGHT) != 0 {
        if x1 == x2 {
            return false;
        }
        let bound = if flags & LEFT != 0 { b.x1 } else { b.x2 };
        *y = (bound - x1) * (y2 - y1) / (x2 - x1) + y1;
        *x = bound;
    }
    let flags = b.clip_flags_y(*y);
    if flags & (TOP|BOTTOM) != 0 {
        if y1 == y2 {
            return false;
        }
        let bound = if flags & BOTTOM != 0 { b.y1 } else { b.y2 };
        *x = (bound - y1) * (x2 - x1) / (y2 - y1) + x1;
        *y = bound;
    }
    true
}

/// Result of clipping a single line segment
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum SegmentClip {
    /// Segment is entirely outside of the box
    Outside,
    /// Segment is visible, `first_moved` and `second_moved` report which
    /// end points were moved onto the box
    Visible { first_moved: bool, second_moved: bool },
}

/// Clip the line segment (x1,y1) - (x2,y2) to a rectangle
///
/// End points are updated in place
pub fn clip_line_segment(x1: &mut f64, y1: &mut f64, x2: &mut f64, y2: &mut f64,
                         b: &Rectangle<f64>) -> SegmentClip {
    let f1 = b.clip_flags(*x1, *y1);
    let f2 = b.clip_flags(*x2, *y2);
    if f1 | f2 == INSIDE {
        return SegmentClip::Visible { first_moved: false, second_moved: false };
    }
    let fx = LEFT | RIGHT;
    let fy = TOP | BOTTOM;
    if f1 & fx != 0 && f1 & fx == f2 & fx {
        return SegmentClip::Outside;
    }
    if f1 & fy != 0 && f1 & fy == f2 & fy {
        return SegmentClip::Outside;
    }
    let (tx1, ty1, tx2, ty2) = (*x1, *y1, *x2, *y2);
    let mut first_moved = false;
    let mut second_moved = false;
    if f1 != INSIDE {
        if ! clip_move_point(tx1, ty1, tx2, ty2, b, x1, y1, f1) {
            return SegmentClip::Outside;
        }
        if *x1 == *x2 && *y1 == *y2 {
            return SegmentClip::Outside;
        }
        first_moved = true;
    }
    if f2 != INSIDE {
        if ! clip_move_point(tx1, ty1, tx2, ty2, b, x2, y2, f2) {
            return SegmentClip::Outside;
        }
        if *x1 == *x2 && *y1 == *y2 {
            return SegmentClip::Outside;
        }
        second_moved = true;
    }
    SegmentClip::Visible { first_moved, second_moved }
}

/// Clip Region
///
/// Clipping for Rasterizers, in subpixel integer coordinates
#[derive(Debug,Default)]
pub struct Clip {
    /// Current x Point
    x1: i64,
    /// Current y Point
    y1: i64,
    /// Rectangle to clip on
    clip_box: Option<Rectangle<i64>>,
    /// Current clip flag for point (x1,y1)
    clip_flag: u8,
}

fn mul_div(a: i64, b: i64, c: i64) -> i64 {
    let (a,b,c) = (a as f64, b as f64, c as f64);
    (a * b / c).round() as i64
}
impl Clip {
    /// Create new Clipping region
    pub fn new() -> Self {
        Self {x1: 0, y1: 0,
              clip_box: None,
              clip_flag: INSIDE }
    }
    /// Clip a line along the top and bottom of the regon
    fn line_clip_y(&self, ras: &mut RasterizerCell,
                   x1: i64, y1: i64,
                   x2: i64, y2: i64,
                   f1: u8, f2: u8) {
        let b = match self.clip_box {
            None => return,
            Some(ref b) => b,
        };
        let f1 = f1 & (TOP|BOTTOM);
        let f2 = f2 & (TOP|BOTTOM);
        // Fully Visible in y
        if f1 == INSIDE && f2 == INSIDE {
            ras.line(x1,y1,x2,y2);
        } else {
            // Both points above or below clip box
            if f1 == f2 {
                return;
            }
            let (mut tx1, mut ty1, mut tx2, mut ty2) = (x1,y1,x2,y2);
            if f1 & BOTTOM != 0 {
                tx1 = x1 + mul_div(b.y1-y1, x2-x1, y2-y1);
                ty1 = b.y1;
            }
            if f1 & TOP != 0 {
                tx1 = x1 + mul_div(b.y2-y1, x2-x1, y2-y1);
                ty1 = b.y2;
            }
            if f2 & BOTTOM != 0 {
                tx2 = x1 + mul_div(b.y1-y1, x2-x1, y2-y1);
                ty2 = b.y1;
            }
            if f2 & TOP != 0 {
                tx2 = x1 + mul_div(b.y2-y1, x2-x1, y2-y1);
                ty2 = b.y2;
            }
            ras.line(tx1,ty1,tx2,ty2);
        }
    }

    /// Draw a line from (x1,y1) to (x2,y2) into a RasterizerCell
    ///
    /// Final point (x2,y2) is saved internally as (x1,y1))
    pub fn line_to(&mut self, ras: &mut RasterizerCell, x2: i64, y2: i64) {
        if let Some(b) = self.clip_box {
            let f2 = b.clip_flags(x2,y2);
            // Both points above or below clip box
            let fy1 = (TOP | BOTTOM) & self.clip_flag;
            let fy2 = (TOP | BOTTOM) & f2;
            if fy1 != INSIDE && fy1 == fy2 {
                self.x1 = x2;
                self.y1 = y2;
                self.clip_flag = f2;
                return;
            }
            let (x1,y1,f1) = (self.x1, self.y1, self.clip_flag);
            match (f1 & (LEFT|RIGHT), f2 & (LEFT|RIGHT)) {
                (INSIDE,INSIDE) => self.line_clip_y(ras, x1,y1,x2,y2,f1,f2),
                (INSIDE,RIGHT) => {
                    let y3 = y1 + mul_div(b.x2-x1, y2-y1, x2-x1);
                    let f3 = b.clip_flags_y(y3);
                    self.line_clip_y(ras, x1,   y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, b.x2, y2, f3, f2);
                },
                (RIGHT,INSIDE) => {
                    let y3 = y1 + mul_div(b.x2-x1, y2-y1, x2-x1);
                    let f3 = b.clip_flags_y(y3);
                    self.line_clip_y(ras, b.x2, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3,   x2, y2, f3, f2);
                },
                (INSIDE,LEFT) => {
                    let y3 = y1 + mul_div(b.x1-x1, y2-y1, x2-x1);
                    let f3 = b.clip_flags_y(y3);
                    self.line_clip_y(ras, x1,   y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, b.x1, y2, f3, f2);
                },
                (RIGHT,LEFT) => {
                    let y3 = y1 + mul_div(b.x2-x1, y2-y1, x2-x1);
                    let y4 = y1 + mul_div(b.x1-x1, y2-y1, x2-x1);
                    let f3 = b.clip_flags_y(y3);
                    let f4 = b.clip_flags_y(y4);
                    self.line_clip_y(ras, b.x2, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, b.x1, y4, f3, f4);
                    self.line_clip_y(ras, b.x1, y4, b.x1, y2, f4, f2);
                },
                (LEFT,INSIDE) => {
                    let y3 = y1 + mul_div(b.x1-x1, y2-y1, x2-x1);
                    let f3 = b.clip_flags_y(y3);
                    self.line_clip_y(ras, b.x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3,   x2, y2, f3, f2);
                },
                (LEFT,RIGHT) => {
                    let y3 = y1 + mul_div(b.x1-x1, y2-y1, x2-x1);
                    let y4 = y1 + mul_div(b.x2-x1, y2-y1, x2-x1);
                    let f3 = b.clip_flags_y(y3);
                    let f4 = b.clip_flags_y(y4);
                    self.line_clip_y(ras, b.x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, b.x2, y4, f3, f4);
                    self.line_clip_y(ras, b.x2, y4, b.x2, y2, f4, f2);
                },
                (LEFT,LEFT)   => self.line_clip_y(ras, b.x1,y1,b.x1,y2,f1,f2),
                (RIGHT,RIGHT) => self.line_clip_y(ras, b.x2,y1,b.x2,y2,f1,f2),
                // LEFT|RIGHT together cannot happen for a sorted box
                (_,_) => {},
            }
            self.clip_flag = f2;
        } else {
            ras.line(self.x1, self.y1, x2, y2);
        }
        self.x1 = x2;
        self.y1 = y2;
    }
    /// Move to point (x2,y2)
    ///
    /// Point is saved internally as (x1,y1)
    pub fn move_to(&mut self, x2: i64, y2: i64) {
        self.x1 = x2;
        self.y1 = y2;
        if let Some(ref b) = self.clip_box {
            self.clip_flag = b.clip_flags(x2, y2);
        }
    }
    /// Define the clipping region
    pub fn clip_box(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        self.clip_box = Some( Rectangle::new(x1, y1, x2, y2) );
    }
    /// Remove the clipping region
    pub fn reset_clipping(&mut self) {
        self.clip_box = None;
        self.clip_flag = INSIDE;
    }
}
