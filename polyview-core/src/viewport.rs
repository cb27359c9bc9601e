/// Viewport partitioning for multi-view windows
use crate::error::Error;

/// A normalized viewport rectangle with its origin at the bottom-left
/// of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Viewport {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Map to an integer pixel rectangle. Raster rows run top-down, so
    /// the vertical axis flips; neighboring viewports round to the same
    /// shared edge.
    pub fn to_pixels(&self, window_w: u32, window_h: u32) -> PixelRect {
        let x = (self.x0 * window_w as f32).round() as u32;
        let right = (self.x1 * window_w as f32).round() as u32;
        let top = ((1.0 - self.y1) * window_h as f32).round() as u32;
        let bottom = ((1.0 - self.y0) * window_h as f32).round() as u32;
        PixelRect {
            x,
            y: top,
            w: right.saturating_sub(x),
            h: bottom.saturating_sub(top),
        }
    }
}

/// An integer pixel rectangle, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Partition the window into `count` viewports, in display order.
///
/// One view fills the window; two and three form vertical columns left
/// to right; four form a 2x2 grid ordered top-left, top-right,
/// bottom-left, bottom-right.
pub fn layout(count: usize) -> Result<Vec<Viewport>, Error> {
    match count {
        1 => Ok(vec![Viewport::new(0.0, 0.0, 1.0, 1.0)]),
        2 => Ok(vec![
            Viewport::new(0.0, 0.0, 0.5, 1.0),
            Viewport::new(0.5, 0.0, 1.0, 1.0),
        ]),
        3 => Ok(vec![
            Viewport::new(0.0, 0.0, 0.333333, 1.0),
            Viewport::new(0.333333, 0.0, 0.666666, 1.0),
            Viewport::new(0.666666, 0.0, 1.0, 1.0),
        ]),
        4 => Ok(vec![
            Viewport::new(0.0, 0.5, 0.5, 1.0),
            Viewport::new(0.5, 0.5, 1.0, 1.0),
            Viewport::new(0.0, 0.0, 0.5, 0.5),
            Viewport::new(0.5, 0.0, 1.0, 0.5),
        ]),
        other => Err(Error::InvalidTileCount(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_view_fills_window() {
        let viewports = layout(1).unwrap();
        assert_eq!(viewports, vec![Viewport::new(0.0, 0.0, 1.0, 1.0)]);
    }

    #[test]
    fn test_two_views_split_at_half() {
        let viewports = layout(2).unwrap();
        assert_eq!(viewports[0], Viewport::new(0.0, 0.0, 0.5, 1.0));
        assert_eq!(viewports[1], Viewport::new(0.5, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_three_views_share_column_boundaries() {
        let viewports = layout(3).unwrap();
        assert_eq!(viewports.len(), 3);
        assert_eq!(viewports[0].x1, viewports[1].x0);
        assert_eq!(viewports[1].x1, viewports[2].x0);
        let area: f32 = viewports.iter().map(Viewport::area).sum();
        assert!((area - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_four_views_quadrant_order() {
        let viewports = layout(4).unwrap();
        assert_eq!(viewports[0], Viewport::new(0.0, 0.5, 0.5, 1.0)); // top-left
        assert_eq!(viewports[1], Viewport::new(0.5, 0.5, 1.0, 1.0)); // top-right
        assert_eq!(viewports[2], Viewport::new(0.0, 0.0, 0.5, 0.5)); // bottom-left
        assert_eq!(viewports[3], Viewport::new(0.5, 0.0, 1.0, 0.5)); // bottom-right
        let area: f32 = viewports.iter().map(Viewport::area).sum();
        assert!((area - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unsupported_counts_are_rejected() {
        assert_eq!(layout(0), Err(Error::InvalidTileCount(0)));
        assert_eq!(layout(5), Err(Error::InvalidTileCount(5)));
    }

    #[test]
    fn test_to_pixels_flips_vertically() {
        // Top-left quadrant lands in the top rows of the raster.
        let top_left = Viewport::new(0.0, 0.5, 0.5, 1.0).to_pixels(800, 800);
        assert_eq!(top_left, PixelRect { x: 0, y: 0, w: 400, h: 400 });
        let bottom_left = Viewport::new(0.0, 0.0, 0.5, 0.5).to_pixels(800, 800);
        assert_eq!(bottom_left, PixelRect { x: 0, y: 400, w: 400, h: 400 });
    }

    #[test]
    fn test_to_pixels_tiles_without_gap_or_overlap() {
        let rects: Vec<PixelRect> = layout(3)
            .unwrap()
            .iter()
            .map(|v| v.to_pixels(100, 50))
            .collect();
        assert_eq!(rects[0].x, 0);
        for pair in rects.windows(2) {
            assert_eq!(pair[0].x + pair[0].w, pair[1].x);
        }
        let last = rects[2];
        assert_eq!(last.x + last.w, 100);
        assert!(rects.iter().all(|r| r.y == 0 && r.h == 50));
    }
}
