use super::*;

/// Inclusive block of cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellRange {
    pub(crate) min_col: u32,
    pub(crate) min_row: u32,
    pub(crate) max_col: u32,
    pub(crate) max_row: u32,
}

impl CellRange {
    #[inline(always)]
    pub(crate) fn contains(&self, col: u32, row: u32) -> bool {
        col >= self.min_col && col <= self.max_col && row >= self.min_row && row <= self.max_row
    }
}

/// Maps world coordinates to cells. Coordinates outside the grid clamp to the
/// edge cells.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CellLayout {
    pub(crate) num_cols: u32,
    pub(crate) num_rows: u32,
    pub(crate) cell_width: f32,
    pub(crate) cell_height: f32,
    pub(crate) offset_x: f32,
    pub(crate) offset_y: f32,
}

impl CellLayout {
    pub(crate) fn new(
        cell_width: f32,
        cell_height: f32,
        bound_width: f32,
        bound_height: f32,
        offset_x: f32,
        offset_y: f32,
    ) -> GridResult<Self> {
        validate_cell_size(cell_width, cell_height)?;
        if !(bound_width.is_finite() && bound_height.is_finite())
            || bound_width <= 0.0
            || bound_height <= 0.0
        {
            return Err(GridError::InvalidBounds {
                width: bound_width,
                height: bound_height,
            });
        }
        let cols = (bound_width / cell_width).floor() as f64 + 1.0;
        let rows = (bound_height / cell_height).floor() as f64 + 1.0;
        // Cell indices are stored as u32 and NIL must stay unused.
        if cols * rows >= NIL as f64 {
            return Err(GridError::TooManyCells { cols, rows });
        }
        Ok(Self {
            num_cols: cols as u32,
            num_rows: rows as u32,
            cell_width,
            cell_height,
            offset_x,
            offset_y,
        })
    }

    #[inline(always)]
    pub(crate) fn col(&self, x: f32) -> u32 {
        let local = (x - self.offset_x) / self.cell_width;
        if local <= 0.0 {
            return 0;
        }
        (local as u32).min(self.num_cols - 1)
    }

    #[inline(always)]
    pub(crate) fn row(&self, y: f32) -> u32 {
        let local = (y - self.offset_y) / self.cell_height;
        if local <= 0.0 {
            return 0;
        }
        (local as u32).min(self.num_rows - 1)
    }

    #[inline(always)]
    pub(crate) fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.num_cols as usize + col as usize
    }

    #[inline(always)]
    pub(crate) fn range(&self, area: &Aabb) -> CellRange {
        CellRange {
            min_col: self.col(area.left),
            min_row: self.row(area.bottom),
            max_col: self.col(area.right),
            max_row: self.row(area.top),
        }
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.num_cols as usize * self.num_rows as usize
    }

    pub(crate) fn contains_cell(&self, col: u32, row: u32) -> bool {
        col < self.num_cols && row < self.num_rows
    }
}

pub(crate) fn validate_cell_size(width: f32, height: f32) -> GridResult<()> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(GridError::InvalidCellSize { width, height });
    }
    Ok(())
}

/// Fine cell of a loose grid. `bounds` only grows between tighten passes and
/// is meaningless while the cell is empty.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LooseCell {
    pub(crate) head: EltIndex,
    pub(crate) bounds: Aabb,
    pub(crate) query_mark: u32,
}

impl LooseCell {
    pub(crate) const EMPTY: LooseCell = LooseCell {
        head: NIL,
        bounds: Aabb::EMPTY,
        query_mark: 0,
    };

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.head == NIL
    }

    /// Links the element and fits the bounds around it.
    #[inline(always)]
    pub(crate) fn push<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) {
        let bounds = store.elt(index).bounds();
        if self.is_empty() {
            self.bounds = bounds;
        } else {
            self.bounds.expand_to_include(&bounds);
        }
        push_elt(&mut self.head, store, index);
    }

    #[inline(always)]
    pub(crate) fn unlink<S: EltStore + ?Sized>(&mut self, store: &mut S, id: u32) -> bool {
        unlink_elt(&mut self.head, store, id)
    }

    /// Recomputes the bounds from the members. Empty cells get `Aabb::EMPTY`.
    pub(crate) fn contract<S: EltStore + ?Sized>(&mut self, store: &S) {
        let mut bounds = Aabb::EMPTY;
        let mut current = self.head;
        while current != NIL {
            let elt = store.elt(current);
            bounds.expand_to_include(&elt.bounds());
            current = elt.next_elt();
        }
        self.bounds = bounds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_and_cols_include_the_far_edge() {
        let layout = CellLayout::new(10.0, 10.0, 100.0, 95.0, 0.0, 0.0).unwrap();
        assert_eq!((layout.num_cols, layout.num_rows), (11, 10));
        assert_eq!(layout.col(100.0), 10);
        assert_eq!(layout.row(95.0), 9);
        assert_eq!(layout.cell_count(), 110);
    }

    #[test]
    fn out_of_range_coordinates_clamp() {
        let layout = CellLayout::new(10.0, 10.0, 100.0, 100.0, 0.0, 0.0).unwrap();
        assert_eq!(layout.col(-5.0), 0);
        assert_eq!(layout.row(-1000.0), 0);
        assert_eq!(layout.col(1e9), 10);
        assert_eq!(layout.row(f32::INFINITY), 10);
        assert_eq!(layout.col(f32::NEG_INFINITY), 0);
    }

    #[test]
    fn offset_shifts_cell_origin() {
        let layout = CellLayout::new(10.0, 10.0, 100.0, 100.0, -50.0, -50.0).unwrap();
        assert_eq!(layout.col(-50.0), 0);
        assert_eq!(layout.col(-41.0), 0);
        assert_eq!(layout.col(-40.0), 1);
        assert_eq!(layout.row(0.0), 5);
        assert_eq!(layout.index(3, 2), 2 * 11 + 3);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(
            CellLayout::new(0.0, 10.0, 100.0, 100.0, 0.0, 0.0).unwrap_err(),
            GridError::InvalidCellSize {
                width: 0.0,
                height: 10.0
            }
        );
        assert!(CellLayout::new(10.0, f32::NAN, 100.0, 100.0, 0.0, 0.0).is_err());
        assert_eq!(
            CellLayout::new(10.0, 10.0, -1.0, 100.0, 0.0, 0.0).unwrap_err(),
            GridError::InvalidBounds {
                width: -1.0,
                height: 100.0
            }
        );
    }

    #[test]
    fn rejects_unaddressable_cell_counts() {
        assert_eq!(
            CellLayout::new(1e-6, 1e-6, 1e6, 1e6, 0.0, 0.0).unwrap_err(),
            GridError::TooManyCells {
                cols: (1e6f32 / 1e-6f32).floor() as f64 + 1.0,
                rows: (1e6f32 / 1e-6f32).floor() as f64 + 1.0,
            }
        );
        assert!(matches!(
            CellLayout::new(1.0, 1.0, 65536.0, 65536.0, 0.0, 0.0),
            Err(GridError::TooManyCells { .. })
        ));
        assert!(matches!(
            CellLayout::new(f32::MIN_POSITIVE, 1.0, f32::MAX, 1.0, 0.0, 0.0),
            Err(GridError::TooManyCells { .. })
        ));

        let layout = CellLayout::new(1.0, 1.0, 65534.0, 65534.0, 0.0, 0.0).unwrap();
        assert_eq!((layout.num_cols, layout.num_rows), (65535, 65535));
        assert_eq!(layout.cell_count(), 65535 * 65535);
    }

    #[test]
    fn range_covers_box() {
        let layout = CellLayout::new(25.0, 25.0, 100.0, 100.0, 0.0, 0.0).unwrap();
        let range = layout.range(&Aabb::new(20.0, 30.0, 60.0, 49.0));
        assert_eq!(
            range,
            CellRange {
                min_col: 0,
                min_row: 1,
                max_col: 2,
                max_row: 1
            }
        );
        assert!(range.contains(1, 1));
        assert!(!range.contains(1, 0));
    }
}
