use super::*;

/// Grid for elements that share a known maximum size. Each element lives in
/// the cell holding its anchor. Queries widen the searched cell range by the
/// size bound, so no per-cell bounds are kept.
pub struct UniformGrid {
    layout: CellLayout,
    heads: Vec<EltIndex>,
    row_counts: Vec<u32>,
    elt_width: u32,
    elt_height: u32,
    bound_width: f32,
    bound_height: f32,
    len: usize,
}

impl UniformGrid {
    pub fn new(
        elt_width: u32,
        elt_height: u32,
        cell_width: f32,
        cell_height: f32,
        bound_width: f32,
        bound_height: f32,
    ) -> GridResult<Self> {
        Self::new_with_config(
            elt_width,
            elt_height,
            cell_width,
            cell_height,
            bound_width,
            bound_height,
            Config::default(),
        )
    }

    pub fn new_with_config(
        elt_width: u32,
        elt_height: u32,
        cell_width: f32,
        cell_height: f32,
        bound_width: f32,
        bound_height: f32,
        config: Config,
    ) -> GridResult<Self> {
        let layout = CellLayout::new(
            cell_width,
            cell_height,
            bound_width,
            bound_height,
            config.offset_x,
            config.offset_y,
        )?;
        debug!(
            "uniform grid: {}x{} cells of {}x{}, elements up to {}x{}",
            layout.num_cols, layout.num_rows, cell_width, cell_height, elt_width, elt_height
        );
        Ok(Self {
            heads: vec![NIL; layout.cell_count()],
            row_counts: vec![0; layout.num_rows as usize],
            layout,
            elt_width,
            elt_height,
            bound_width,
            bound_height,
            len: 0,
        })
    }

    pub fn insert<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) {
        let elt = store.elt(index);
        let (col, row) = self.cell_coords(elt.left_x(), elt.bottom_y());
        debug_assert!(
            elt.width() <= self.elt_width && elt.height() <= self.elt_height,
            "element {} is larger than the grid's element bound",
            elt.id()
        );
        self.insert_to_cell(store, index, col, row);
    }

    /// Removes the element from the cell of its current anchor.
    pub fn remove<S: EltStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: EltIndex,
    ) -> GridResult<()> {
        let elt = store.elt(index);
        let (col, row) = self.cell_coords(elt.left_x(), elt.bottom_y());
        self.remove_from_cell(store, index, col, row)
    }

    pub fn relocate<S: EltStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: EltIndex,
        from_x: f32,
        from_y: f32,
        to_x: f32,
        to_y: f32,
    ) -> GridResult<()> {
        let (from_col, from_row) = self.cell_coords(from_x, from_y);
        let (to_col, to_row) = self.cell_coords(to_x, to_y);
        if (from_col, from_row) != (to_col, to_row) {
            self.remove_from_cell(store, index, from_col, from_row)?;
            self.insert_to_cell(store, index, to_col, to_row);
        }
        Ok(())
    }

    /// Fills `results` with every element whose box overlaps `area`, less the
    /// element whose id is `omit`.
    pub fn query<S: EltStore + ?Sized>(
        &self,
        store: &S,
        area: Aabb,
        omit: Option<u32>,
        results: &mut Vec<EltIndex>,
    ) {
        results.clear();
        self.query_with(store, area, omit, |index| results.push(index));
    }

    pub fn query_with<S, F>(&self, store: &S, area: Aabb, omit: Option<u32>, mut f: F)
    where
        S: EltStore + ?Sized,
        F: FnMut(EltIndex),
    {
        // Anchors of overlapping elements lie in `area` grown left/bottom by
        // the element size bound.
        let search = Aabb::new(
            area.left - self.elt_width as f32,
            area.bottom - self.elt_height as f32,
            area.right,
            area.top,
        );
        let range = self.layout.range(&search);
        for row in range.min_row..=range.max_row {
            if self.row_counts[row as usize] == 0 {
                continue;
            }
            for col in range.min_col..=range.max_col {
                let mut current = self.heads[self.layout.index(col, row)];
                while current != NIL {
                    let elt = store.elt(current);
                    if omit != Some(elt.id()) && elt.bounds().overlaps(&area) {
                        f(current);
                    }
                    current = elt.next_elt();
                }
            }
        }
    }

    pub fn traverse<V: UniformGridVisitor + ?Sized>(&self, visitor: &mut V) {
        let layout = &self.layout;
        visitor.grid(
            self.bound_width,
            self.bound_height,
            layout.cell_width,
            layout.cell_height,
        );
        for row in 0..layout.num_rows {
            if self.row_counts[row as usize] == 0 {
                continue;
            }
            for col in 0..layout.num_cols {
                let head = self.heads[layout.index(col, row)];
                if head != NIL {
                    visitor.cell(head, col, row, layout.cell_width, layout.cell_height);
                }
            }
        }
    }

    /// Cell holding an anchor at `(x, y)`.
    pub fn cell_coords(&self, x: f32, y: f32) -> (u32, u32) {
        (self.layout.col(x), self.layout.row(y))
    }

    pub fn num_cols(&self) -> u32 {
        self.layout.num_cols
    }

    pub fn num_rows(&self) -> u32 {
        self.layout.num_rows
    }

    pub fn row_count(&self, row: u32) -> u32 {
        self.row_counts.get(row as usize).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn insert_to_cell<S: EltStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: EltIndex,
        col: u32,
        row: u32,
    ) {
        let cell = self.layout.index(col, row);
        push_elt(&mut self.heads[cell], store, index);
        self.row_counts[row as usize] += 1;
        self.len += 1;
    }

    fn remove_from_cell<S: EltStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: EltIndex,
        col: u32,
        row: u32,
    ) -> GridResult<()> {
        let id = store.elt(index).id();
        let cell = self.layout.index(col, row);
        if !unlink_elt(&mut self.heads[cell], store, id) {
            return Err(GridError::ElementNotFound { id, col, row });
        }
        self.row_counts[row as usize] -= 1;
        self.len -= 1;
        Ok(())
    }
}

impl SpatialGrid for UniformGrid {
    fn insert<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) {
        UniformGrid::insert(self, store, index)
    }

    fn remove<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) -> GridResult<()> {
        UniformGrid::remove(self, store, index)
    }

    fn relocate<S: EltStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: EltIndex,
        from_x: f32,
        from_y: f32,
        to_x: f32,
        to_y: f32,
    ) -> GridResult<()> {
        UniformGrid::relocate(self, store, index, from_x, from_y, to_x, to_y)
    }

    fn query_with<S, F>(&mut self, store: &S, area: Aabb, omit: Option<u32>, f: F)
    where
        S: EltStore + ?Sized,
        F: FnMut(EltIndex),
    {
        UniformGrid::query_with(self, store, area, omit, f)
    }

    fn tighten<S: EltStore + ?Sized>(&mut self, _store: &S) {}

    fn len(&self) -> usize {
        self.len
    }
}
