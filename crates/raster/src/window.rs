//! Rectangular block windows over a raster grid.

/// A rectangular sub-region of a raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockWindow {
    /// Column of the left edge.
    pub col_off: usize,
    /// Row of the top edge.
    pub row_off: usize,
    /// Width in columns.
    pub width: usize,
    /// Height in rows.
    pub height: usize,
}

impl BlockWindow {
    /// Creates a window.
    pub fn new(col_off: usize, row_off: usize, width: usize, height: usize) -> Self {
        Self {
            col_off,
            row_off,
            width,
            height,
        }
    }

    /// Offset as GDAL expects it, `(x, y)`.
    pub fn offset(&self) -> (isize, isize) {
        (self.col_off as isize, self.row_off as isize)
    }

    /// Size as GDAL expects it, `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Array shape `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Number of pixels in the window.
    pub fn n_pixels(&self) -> usize {
        self.width * self.height
    }

    /// Returns `true` if the window lies inside a `width` x `height` raster.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        self.col_off + self.width <= width && self.row_off + self.height <= height
    }
}

/// Enumerates the row-major grid of `block_width` x `block_height` windows
/// covering a `width` x `height` raster. Windows on the right and bottom
/// edges are truncated to the raster.
///
/// A zero block dimension is treated as 1.
pub fn block_windows(
    width: usize,
    height: usize,
    block_width: usize,
    block_height: usize,
) -> Vec<BlockWindow> {
    let bw = block_width.max(1);
    let bh = block_height.max(1);
    let mut windows = Vec::with_capacity(width.div_ceil(bw) * height.div_ceil(bh));
    for row_off in (0..height).step_by(bh) {
        for col_off in (0..width).step_by(bw) {
            windows.push(BlockWindow::new(
                col_off,
                row_off,
                bw.min(width - col_off),
                bh.min(height - row_off),
            ));
        }
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_grid() {
        let windows = block_windows(512, 256, 256, 256);
        assert_eq!(
            windows,
            vec![
                BlockWindow::new(0, 0, 256, 256),
                BlockWindow::new(256, 0, 256, 256),
            ]
        );
    }

    #[test]
    fn truncated_edges() {
        let windows = block_windows(5, 3, 2, 2);
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[2], BlockWindow::new(4, 0, 1, 2));
        assert_eq!(windows[5], BlockWindow::new(4, 2, 1, 1));
        let covered: usize = windows.iter().map(BlockWindow::n_pixels).sum();
        assert_eq!(covered, 15);
    }

    #[test]
    fn empty_raster_has_no_windows() {
        assert!(block_windows(0, 10, 4, 4).is_empty());
        assert!(block_windows(10, 0, 4, 4).is_empty());
    }

    #[test]
    fn zero_block_size_does_not_loop() {
        assert_eq!(block_windows(2, 2, 0, 0).len(), 4);
    }

    #[test]
    fn fits() {
        let w = BlockWindow::new(2, 2, 3, 3);
        assert!(w.fits(5, 5));
        assert!(!w.fits(4, 5));
        assert_eq!(w.offset(), (2, 2));
        assert_eq!(w.size(), (3, 3));
        assert_eq!(w.shape(), (3, 3));
    }
}
