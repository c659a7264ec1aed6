//! Image rendering helpers used by the CLI.
//!
//! This module plays the rendering collaborator for the editor: it maps world
//! coordinates onto a pixel grid and draws a [`Frame`] with small raster
//! primitives.

use bezcurve::{Frame, Point2};
use image::{Rgba, RgbaImage};

/// Pixel radius of anchor markers.
const ANCHOR_MARKER: i64 = 4;
/// Pixel radius of handle markers.
const HANDLE_MARKER: i64 = 3;
/// Dash pattern for guide lines: pixels on, pixels off.
const GUIDE_DASH: (u32, u32) = (4, 2);
/// Pixel coordinates further than this from the origin are not drawn.
const PIXEL_LIMIT: f64 = (1 << 20) as f64;

/// Colors used when rendering a frame.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    /// Color for the curve strokes.
    pub foreground: Rgba<u8>,
    /// Background fill color.
    pub background: Rgba<u8>,
    /// Anchor marker color.
    pub anchor: Rgba<u8>,
    /// Handle marker color.
    pub handle: Rgba<u8>,
    /// Dashed guide line color.
    pub guide: Rgba<u8>,
}

impl Palette {
    /// Default marker colors over the given curve and background colors.
    pub const fn with_colors(foreground: Rgba<u8>, background: Rgba<u8>) -> Self {
        Self {
            foreground,
            background,
            anchor: Rgba([0xe4, 0x1a, 0x1c, 0xff]),
            handle: Rgba([0x4d, 0xaf, 0x4a, 0xff]),
            guide: Rgba([0x99, 0x99, 0x99, 0xff]),
        }
    }
}

/// Stroke styling and overlay options.
#[derive(Clone, Copy, Debug)]
pub struct StrokeOptions {
    /// Stroke width in pixels.
    pub line_width: u32,
    /// Whether to draw anchors, handles and guide lines over the curve.
    pub show_handles: bool,
    /// Colors.
    pub palette: Palette,
}

/// Affine map from world coordinates to pixels that fits a set of points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// World-space corner mapped to `origin`.
    min: Point2,
    /// Pixels per world unit.
    scale: f64,
    /// Pixel position of `min`.
    origin: (f64, f64),
}

impl Viewport {
    /// Fit `points` into a `width x height` image leaving `margin` pixels on
    /// every side. Aspect ratio is preserved and the content is centered.
    pub fn fit<I>(points: I, width: u32, height: u32, margin: u32) -> Self
    where
        I: IntoIterator<Item = Point2>,
    {
        let mut bounds: Option<(Point2, Point2)> = None;
        for p in points.into_iter().filter(|p| p.is_finite()) {
            bounds = Some(match bounds {
                None => (p, p),
                Some((lo, hi)) => (
                    Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
                ),
            });
        }
        let (min, max) = bounds.unwrap_or((Point2::ZERO, Point2::ZERO));

        let inner_w = f64::from(width.saturating_sub(margin.saturating_mul(2))).max(1.0);
        let inner_h = f64::from(height.saturating_sub(margin.saturating_mul(2))).max(1.0);
        // Half spans stay finite for any pair of finite bounds.
        let half_dx = max.x * 0.5 - min.x * 0.5;
        let half_dy = max.y * 0.5 - min.y * 0.5;
        let scale = if half_dx <= 0.0 && half_dy <= 0.0 {
            1.0
        } else {
            0.5 * (inner_w / half_dx).min(inner_h / half_dy)
        };
        let content_w = max.x * scale - min.x * scale;
        let content_h = max.y * scale - min.y * scale;

        Self {
            min,
            scale,
            origin: (
                f64::from(margin) + (inner_w - content_w) / 2.0,
                f64::from(margin) + (inner_h - content_h) / 2.0,
            ),
        }
    }

    /// A viewport mapping the world rectangle `[0, w) x [0, h)` onto an
    /// image `width` pixels wide, with no margin.
    pub fn region(world_width: f64, width: u32) -> Self {
        Self {
            min: Point2::ZERO,
            scale: f64::from(width) / world_width,
            origin: (0.0, 0.0),
        }
    }

    /// Pixels per world unit.
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Pixel coordinates of `p`, or `None` when `p` is not finite or lands
    /// too far outside any image to be drawn.
    pub fn to_pixel(&self, p: Point2) -> Option<(i64, i64)> {
        let x = (self.origin.0 + (p.x * self.scale - self.min.x * self.scale)).round();
        let y = (self.origin.1 + (p.y * self.scale - self.min.y * self.scale)).round();
        let drawable = |v: f64| v.is_finite() && v.abs() <= PIXEL_LIMIT;
        (drawable(x) && drawable(y)).then_some((x as i64, y as i64))
    }
}

/// Every point a frame will draw, for fitting a viewport.
pub fn frame_points(frame: &Frame) -> impl Iterator<Item = Point2> + '_ {
    frame
        .anchors
        .iter()
        .chain(&frame.handles)
        .chain(frame.polylines.iter().flatten())
        .copied()
}

/// Put a pixel if the coordinates are inside the image bounds.
fn put_pixel_safe(img: &mut RgbaImage, x: i64, y: i64, col: Rgba<u8>) {
    let w = i64::from(img.width());
    let h = i64::from(img.height());
    if x >= 0 && y >= 0 && x < w && y < h {
        img.put_pixel(x as u32, y as u32, col);
    }
}

/// Stamp a filled square centered on `(cx, cy)` with a given side length.
fn stamp_square(img: &mut RgbaImage, cx: i64, cy: i64, size: u32, col: Rgba<u8>) {
    let radius = (i64::from(size) - 1) / 2;
    let extra = if size.is_multiple_of(2) { 1 } else { 0 };
    for y in cy - radius..=cy + radius + extra {
        for x in cx - radius..=cx + radius + extra {
            put_pixel_safe(img, x, y, col);
        }
    }
}

/// Draw a filled disc.
pub fn draw_disc(img: &mut RgbaImage, (cx, cy): (i64, i64), radius: i64, col: Rgba<u8>) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel_safe(img, cx + dx, cy + dy, col);
            }
        }
    }
}

/// Draw a one-pixel circle outline (midpoint algorithm).
pub fn draw_circle(img: &mut RgbaImage, (cx, cy): (i64, i64), radius: i64, col: Rgba<u8>) {
    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    while x >= y {
        for (px, py) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            put_pixel_safe(img, cx + px, cy + py, col);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Draw a 4-connected Bresenham line. With a `dash` of `(on, off)` only the
/// first `on` pixels of every `on + off` are painted.
fn draw_line_pattern(
    img: &mut RgbaImage,
    (mut x0, mut y0): (i64, i64),
    (x1, y1): (i64, i64),
    col: Rgba<u8>,
    line_width: u32,
    dash: Option<(u32, u32)>,
) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut step: u32 = 0;
    loop {
        let on = dash.is_none_or(|(on, off)| step % (on + off) < on);
        if on {
            stamp_square(img, x0, y0, line_width, col);
        }
        step = step.wrapping_add(1);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draw a solid line.
pub fn draw_line(
    img: &mut RgbaImage,
    from: (i64, i64),
    to: (i64, i64),
    col: Rgba<u8>,
    line_width: u32,
) {
    draw_line_pattern(img, from, to, col, line_width, None);
}

/// Render `frame` into a fresh `width x height` image.
pub fn render_frame(
    frame: &Frame,
    view: &Viewport,
    width: u32,
    height: u32,
    stroke: StrokeOptions,
) -> RgbaImage {
    let palette = stroke.palette;
    let mut img = RgbaImage::from_pixel(width, height, palette.background);

    if stroke.show_handles {
        for [anchor, handle] in &frame.guides {
            if let (Some(from), Some(to)) = (view.to_pixel(*anchor), view.to_pixel(*handle)) {
                draw_line_pattern(&mut img, from, to, palette.guide, 1, Some(GUIDE_DASH));
            }
        }
    }

    let line_width = stroke.line_width.max(1);
    for line in &frame.polylines {
        for pair in line.windows(2) {
            if let (Some(from), Some(to)) = (view.to_pixel(pair[0]), view.to_pixel(pair[1])) {
                draw_line(&mut img, from, to, palette.foreground, line_width);
            }
        }
    }

    if stroke.show_handles {
        for h in frame.handles.iter().filter_map(|h| view.to_pixel(*h)) {
            draw_disc(&mut img, h, HANDLE_MARKER, palette.handle);
        }
        for a in frame.anchors.iter().filter_map(|a| view.to_pixel(*a)) {
            draw_disc(&mut img, a, ANCHOR_MARKER, palette.anchor);
        }
    }

    img
}
