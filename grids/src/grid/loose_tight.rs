use super::*;
use std::time::Instant;

/// Loose grid without a coarse overlay. Each cell keeps a box around its
/// members that only grows between [`tighten`](LooseTightGrid::tighten)
/// passes.
pub struct LooseTightGrid {
    layout: CellLayout,
    cells: Vec<LooseCell>,
    bound_width: f32,
    bound_height: f32,
    // Largest element extent seen since the last tighten. Elements anchored up
    // to this far left/below a query can still reach into it.
    reach_x: f32,
    reach_y: f32,
    len: usize,
    profile: ProfileBudget,
}

impl LooseTightGrid {
    pub fn new(
        cell_width: f32,
        cell_height: f32,
        bound_width: f32,
        bound_height: f32,
    ) -> GridResult<Self> {
        Self::new_with_config(
            cell_width,
            cell_height,
            bound_width,
            bound_height,
            Config::default(),
        )
    }

    pub fn new_with_config(
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
            "loose tight grid: {}x{} cells of {}x{}, origin ({}, {})",
            layout.num_cols,
            layout.num_rows,
            cell_width,
            cell_height,
            config.offset_x,
            config.offset_y
        );
        Ok(Self {
            cells: vec![LooseCell::EMPTY; layout.cell_count()],
            layout,
            bound_width,
            bound_height,
            reach_x: 0.0,
            reach_y: 0.0,
            len: 0,
            profile: ProfileBudget::new(&config),
        })
    }

    pub fn insert<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) {
        let elt = store.elt(index);
        let (col, row) = self.cell_coords(elt.left_x(), elt.bottom_y());
        self.insert_to_cell(store, index, col, row);
    }

    /// Removes the element from the cell of its current anchor. The cell box
    /// keeps its size until the next tighten.
    pub fn remove<S: EltStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: EltIndex,
    ) -> GridResult<()> {
        let elt = store.elt(index);
        let (col, row) = self.cell_coords(elt.left_x(), elt.bottom_y());
        self.remove_from_cell(store, index, col, row)
    }

    /// Moves the element between cells when its anchor changed cell, else
    /// grows its cell box to the new position. Membership is only checked
    /// when the cell changes.
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
        } else {
            let bounds = store.elt(index).bounds();
            self.grow_reach(&bounds);
            let cell = &mut self.cells[self.layout.index(to_col, to_row)];
            cell.bounds.expand_to_include(&bounds);
        }
        Ok(())
    }

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
        let search = Aabb::new(
            area.left - self.reach_x,
            area.bottom - self.reach_y,
            area.right,
            area.top,
        );
        let range = self.layout.range(&search);
        for row in range.min_row..=range.max_row {
            for col in range.min_col..=range.max_col {
                let cell = &self.cells[self.layout.index(col, row)];
                if cell.is_empty() || !cell.bounds.overlaps(&area) {
                    continue;
                }
                let mut current = cell.head;
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

    /// Shrinks every cell box to fit its current members.
    pub fn tighten<S: EltStore + ?Sized>(&mut self, store: &S) {
        let start = if self.profile.take() {
            Some(Instant::now())
        } else {
            None
        };
        let mut reach_x = 0.0f32;
        let mut reach_y = 0.0f32;
        let mut occupied = 0usize;
        for cell in self.cells.iter_mut() {
            cell.contract(store);
            if !cell.is_empty() {
                occupied += 1;
                let mut current = cell.head;
                while current != NIL {
                    let elt = store.elt(current);
                    reach_x = reach_x.max(elt.width() as f32);
                    reach_y = reach_y.max(elt.height() as f32);
                    current = elt.next_elt();
                }
            }
        }
        self.reach_x = reach_x;
        self.reach_y = reach_y;
        if let Some(start) = start {
            debug!(
                "loose tight tighten: {:.3}ms cells={} occupied={} elements={}",
                start.elapsed().as_secs_f64() * 1000.0,
                self.cells.len(),
                occupied,
                self.len
            );
        }
    }

    pub fn traverse<V: LooseGridVisitor + ?Sized>(&self, visitor: &mut V) {
        let layout = &self.layout;
        visitor.loose_grid(
            self.bound_width,
            self.bound_height,
            layout.cell_width,
            layout.cell_height,
            layout.offset_x,
            layout.offset_y,
        );
        for row in 0..layout.num_rows {
            for col in 0..layout.num_cols {
                let cell = &self.cells[layout.index(col, row)];
                if !cell.is_empty() {
                    visitor.loose_cell(cell.head, col, row, cell.bounds);
                }
            }
        }
    }

    /// Loose box of a non-empty cell.
    pub fn cell_bounds(&self, col: u32, row: u32) -> Option<Aabb> {
        if !self.layout.contains_cell(col, row) {
            return None;
        }
        let cell = &self.cells[self.layout.index(col, row)];
        if cell.is_empty() {
            None
        } else {
            Some(cell.bounds)
        }
    }

    pub fn cell_coords(&self, x: f32, y: f32) -> (u32, u32) {
        (self.layout.col(x), self.layout.row(y))
    }

    pub fn num_cols(&self) -> u32 {
        self.layout.num_cols
    }

    pub fn num_rows(&self) -> u32 {
        self.layout.num_rows
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    fn grow_reach(&mut self, bounds: &Aabb) {
        self.reach_x = self.reach_x.max(bounds.width());
        self.reach_y = self.reach_y.max(bounds.height());
    }

    fn insert_to_cell<S: EltStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: EltIndex,
        col: u32,
        row: u32,
    ) {
        let bounds = store.elt(index).bounds();
        self.grow_reach(&bounds);
        self.cells[self.layout.index(col, row)].push(store, index);
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
        if !self.cells[self.layout.index(col, row)].unlink(store, id) {
            return Err(GridError::ElementNotFound { id, col, row });
        }
        self.len -= 1;
        Ok(())
    }
}

impl SpatialGrid for LooseTightGrid {
    fn insert<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) {
        LooseTightGrid::insert(self, store, index)
    }

    fn remove<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) -> GridResult<()> {
        LooseTightGrid::remove(self, store, index)
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
        LooseTightGrid::relocate(self, store, index, from_x, from_y, to_x, to_y)
    }

    fn query_with<S, F>(&mut self, store: &S, area: Aabb, omit: Option<u32>, f: F)
    where
        S: EltStore + ?Sized,
        F: FnMut(EltIndex),
    {
        LooseTightGrid::query_with(self, store, area, omit, f)
    }

    fn tighten<S: EltStore + ?Sized>(&mut self, store: &S) {
        LooseTightGrid::tighten(self, store)
    }

    fn len(&self) -> usize {
        self.len
    }
}
