//! Tile geometry in container-relative percentages.
//!
//! Placement comes from a piece's *current* slot; the artwork window it shows
//! comes from its *correct* slot. Each tile paints one large background image
//! scaled to `grid_size * 100%` and shifted so only its own fragment is visible.

use crate::types::{ImageRef, Percent, Point, Position, Rect};

/// Where a tile sits inside the grid container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiecePosition {
    pub row: usize,
    pub col: usize,
    pub top: Percent,
    pub left: Percent,
    pub width: Percent,
    pub height: Percent,
}

impl PiecePosition {
    pub fn for_slot(position: Position, grid_size: usize) -> Self {
        let (row, col) = row_col(position, grid_size);
        let g = grid_size as f64;
        let cell = 100.0 / g;
        Self {
            row,
            col,
            top: Percent(row as f64 * 100.0 / g),
            left: Percent(col as f64 * 100.0 / g),
            width: Percent(cell),
            height: Percent(cell),
        }
    }

    /// Resolve the percentages against a concrete container.
    pub fn to_rect(&self, container: Rect) -> Rect {
        let w = container.width as f64;
        let h = container.height as f64;
        Rect::new(
            container.x + (self.left.fraction() * w) as f32,
            container.y + (self.top.fraction() * h) as f32,
            (self.width.fraction() * w) as f32,
            (self.height.fraction() * h) as f32,
        )
    }
}

/// Background placement of a tile's artwork window.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceBackground {
    pub image: ImageRef,
    pub size_x: Percent,
    pub size_y: Percent,
    pub offset_x: Percent,
    pub offset_y: Percent,
}

impl PieceBackground {
    /// `grid_size` must be at least 2; a single tile has no defined offset.
    pub fn for_slot(correct_position: Position, grid_size: usize, image: ImageRef) -> Self {
        let (row, col) = row_col(correct_position, grid_size);
        let g = grid_size as f64;
        let span = (grid_size - 1) as f64;
        Self {
            image,
            size_x: Percent(g * 100.0),
            size_y: Percent(g * 100.0),
            offset_x: Percent(col as f64 / span * 100.0),
            offset_y: Percent(row as f64 / span * 100.0),
        }
    }

    /// CSS `background-size` value, e.g. `300% 300%`.
    pub fn background_size(&self) -> String {
        format!("{} {}", self.size_x, self.size_y)
    }

    /// CSS `background-position` value, e.g. `50% 50%`.
    pub fn background_position(&self) -> String {
        format!("{} {}", self.offset_x, self.offset_y)
    }

    /// Map a point in the tile (unit square) to the source image (unit square).
    ///
    /// Percentage background offsets align the point `p%` of the image with the
    /// point `p%` of the tile, so the image origin sits at `(1 - scale) * p`.
    pub fn image_uv(&self, u: f64, v: f64) -> (f64, f64) {
        (
            axis_uv(u, self.size_x, self.offset_x),
            axis_uv(v, self.size_y, self.offset_y),
        )
    }
}

fn axis_uv(t: f64, size: Percent, offset: Percent) -> f64 {
    let scale = size.fraction();
    let origin = (1.0 - scale) * offset.fraction();
    (t - origin) / scale
}

/// Grid slot under `pointer`, from geometry alone.
///
/// `None` outside the `grid_size × grid_size` cells or for an empty container.
pub fn hit_test(pointer: Point, container: Rect, grid_size: usize) -> Option<Position> {
    if grid_size == 0 || container.width <= 0.0 || container.height <= 0.0 {
        return None;
    }
    let cell_w = container.width / grid_size as f32;
    let cell_h = container.height / grid_size as f32;
    let col = ((pointer.x - container.x) / cell_w).floor();
    let row = ((pointer.y - container.y) / cell_h).floor();
    let g = grid_size as f32;
    if !(col >= 0.0 && row >= 0.0 && col < g && row < g) {
        return None;
    }
    Some(row as usize * grid_size + col as usize)
}

/// Row-major `(row, col)` of a slot.
pub fn row_col(position: Position, grid_size: usize) -> (usize, usize) {
    (position / grid_size, position % grid_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn position_percentages_for_3x3() {
        let p = PiecePosition::for_slot(5, 3);
        assert_eq!((p.row, p.col), (1, 2));
        assert!(approx(p.top.value(), 100.0 / 3.0));
        assert!(approx(p.left.value(), 200.0 / 3.0));
        assert!(approx(p.width.value(), 100.0 / 3.0));
        assert_eq!(p.width, p.height);
    }

    #[test]
    fn position_resolves_against_container() {
        let p = PiecePosition::for_slot(3, 2);
        let r = p.to_rect(Rect::new(10.0, 20.0, 200.0, 100.0));
        assert_eq!(r, Rect::new(110.0, 70.0, 100.0, 50.0));
    }

    #[test]
    fn center_background_for_3x3() {
        let bg = PieceBackground::for_slot(4, 3, ImageRef::new("img"));
        assert_eq!(bg.background_size(), "300% 300%");
        assert_eq!(bg.background_position(), "50% 50%");
    }

    #[test]
    fn corner_backgrounds_for_4x4() {
        let first = PieceBackground::for_slot(0, 4, ImageRef::new("img"));
        let last = PieceBackground::for_slot(15, 4, ImageRef::new("img"));
        assert_eq!(first.background_position(), "0% 0%");
        assert_eq!(last.background_position(), "100% 100%");
        assert_eq!(last.background_size(), "400% 400%");
    }

    #[test]
    fn image_uv_selects_the_right_window() {
        // Slot (row 1, col 2) of a 3x3 grid shows image x in [2/3, 1], y in [1/3, 2/3].
        let bg = PieceBackground::for_slot(5, 3, ImageRef::new("img"));
        let (x0, y0) = bg.image_uv(0.0, 0.0);
        let (x1, y1) = bg.image_uv(1.0, 1.0);
        assert!(approx(x0, 2.0 / 3.0));
        assert!(approx(y0, 1.0 / 3.0));
        assert!(approx(x1, 1.0));
        assert!(approx(y1, 2.0 / 3.0));
    }

    #[test]
    fn hit_test_maps_pointer_to_slot() {
        let container = Rect::new(100.0, 50.0, 300.0, 300.0);
        assert_eq!(hit_test(Point::new(100.0, 50.0), container, 3), Some(0));
        assert_eq!(hit_test(Point::new(250.0, 200.0), container, 3), Some(4));
        assert_eq!(hit_test(Point::new(399.0, 349.0), container, 3), Some(8));
    }

    #[test]
    fn hit_test_rejects_outside_and_degenerate() {
        let container = Rect::new(100.0, 50.0, 300.0, 300.0);
        assert_eq!(hit_test(Point::new(99.0, 60.0), container, 3), None);
        assert_eq!(hit_test(Point::new(400.0, 60.0), container, 3), None);
        assert_eq!(hit_test(Point::new(150.0, 350.0), container, 3), None);
        assert_eq!(
            hit_test(Point::new(0.0, 0.0), Rect::new(0.0, 0.0, 0.0, 0.0), 3),
            None
        );
    }

    #[test]
    fn row_col_is_row_major() {
        assert_eq!(row_col(0, 4), (0, 0));
        assert_eq!(row_col(7, 4), (1, 3));
        assert_eq!(row_col(8, 4), (2, 0));
    }
}
