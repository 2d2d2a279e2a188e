use super::*;
use crate::storage::BucketList;
use std::time::Instant;

/// Loose fine grid with a coarse overlay. Every non-empty fine cell is
/// registered in each coarse cell its loose box overlaps, so a query walks the
/// coarse cells under the area instead of every fine cell.
///
/// Registrations only accumulate between tighten passes. A coarse cell may
/// list a fine cell that has since emptied or shrunk; queries reject those by
/// box and visit each fine cell at most once.
pub struct LooseDoubleGrid {
    layout: CellLayout,
    coarse_layout: CellLayout,
    cells: Vec<LooseCell>,
    coarse_cells: Vec<BucketList<u32>>,
    bound_width: f32,
    bound_height: f32,
    query_tick: u32,
    len: usize,
    profile: ProfileBudget,
}

impl LooseDoubleGrid {
    pub fn new(
        cell_width: f32,
        cell_height: f32,
        coarse_width: f32,
        coarse_height: f32,
        bound_width: f32,
        bound_height: f32,
    ) -> GridResult<Self> {
        Self::new_with_config(
            cell_width,
            cell_height,
            coarse_width,
            coarse_height,
            bound_width,
            bound_height,
            Config::default(),
        )
    }

    pub fn new_with_config(
        cell_width: f32,
        cell_height: f32,
        coarse_width: f32,
        coarse_height: f32,
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
        validate_cell_size(coarse_width, coarse_height)?;
        if coarse_width <= cell_width || coarse_height <= cell_height {
            return Err(GridError::CoarseCellTooSmall {
                cell_width,
                cell_height,
                coarse_width,
                coarse_height,
            });
        }
        let coarse_layout = CellLayout::new(
            coarse_width,
            coarse_height,
            bound_width,
            bound_height,
            config.offset_x,
            config.offset_y,
        )?;
        debug!(
            "loose double grid: {}x{} cells of {}x{}, {}x{} coarse cells of {}x{}",
            layout.num_cols,
            layout.num_rows,
            cell_width,
            cell_height,
            coarse_layout.num_cols,
            coarse_layout.num_rows,
            coarse_width,
            coarse_height
        );
        let coarse_cells = (0..coarse_layout.cell_count())
            .map(|_| BucketList::with_capacity(config.coarse_capacity))
            .collect();
        Ok(Self {
            cells: vec![LooseCell::EMPTY; layout.cell_count()],
            coarse_cells,
            layout,
            coarse_layout,
            bound_width,
            bound_height,
            query_tick: 0,
            len: 0,
            profile: ProfileBudget::new(&config),
        })
    }

    pub fn insert<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) {
        let elt = store.elt(index);
        let (col, row) = self.cell_coords(elt.left_x(), elt.bottom_y());
        self.insert_to_cell(store, index, col, row);
    }

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
        } else {
            let bounds = store.elt(index).bounds();
            self.expand_cell(self.layout.index(to_col, to_row), &bounds);
        }
        Ok(())
    }

    /// Takes `&mut self` because visited fine cells are stamped with the
    /// current query tick.
    pub fn query<S: EltStore + ?Sized>(
        &mut self,
        store: &S,
        area: Aabb,
        omit: Option<u32>,
        results: &mut Vec<EltIndex>,
    ) {
        results.clear();
        self.query_with(store, area, omit, |index| results.push(index));
    }

    pub fn query_with<S, F>(&mut self, store: &S, area: Aabb, omit: Option<u32>, mut f: F)
    where
        S: EltStore + ?Sized,
        F: FnMut(EltIndex),
    {
        let tick = self.next_query_tick();
        let range = self.coarse_layout.range(&area);
        let cells = &mut self.cells;
        for row in range.min_row..=range.max_row {
            for col in range.min_col..=range.max_col {
                let coarse = &self.coarse_cells[self.coarse_layout.index(col, row)];
                for (_, &cell_index) in coarse.iter() {
                    let cell = &mut cells[cell_index as usize];
                    if cell.query_mark == tick {
                        continue;
                    }
                    cell.query_mark = tick;
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
    }

    /// Shrinks every fine cell to its members and rebuilds the coarse overlay
    /// from the new boxes.
    pub fn tighten<S: EltStore + ?Sized>(&mut self, store: &S) {
        let start = if self.profile.take() {
            Some(Instant::now())
        } else {
            None
        };
        for coarse in self.coarse_cells.iter_mut() {
            coarse.clear();
        }
        let mut occupied = 0usize;
        let mut registrations = 0usize;
        for cell_index in 0..self.cells.len() {
            let cell = &mut self.cells[cell_index];
            cell.contract(store);
            if cell.is_empty() {
                continue;
            }
            occupied += 1;
            let range = self.coarse_layout.range(&cell.bounds);
            registrations += self.register(cell_index, range, None);
        }
        if let Some(start) = start {
            debug!(
                "loose double tighten: {:.3}ms cells={} occupied={} registrations={} elements={}",
                start.elapsed().as_secs_f64() * 1000.0,
                self.cells.len(),
                occupied,
                registrations,
                self.len
            );
        }
    }

    pub fn traverse<V: LooseGridVisitor + ?Sized>(&self, visitor: &mut V) {
        let coarse_layout = &self.coarse_layout;
        let layout = &self.layout;
        visitor.coarse_grid(
            self.bound_width,
            self.bound_height,
            coarse_layout.cell_width,
            coarse_layout.cell_height,
        );
        visitor.loose_grid(
            self.bound_width,
            self.bound_height,
            layout.cell_width,
            layout.cell_height,
            layout.offset_x,
            layout.offset_y,
        );
        for row in 0..coarse_layout.num_rows {
            for col in 0..coarse_layout.num_cols {
                let coarse = &self.coarse_cells[coarse_layout.index(col, row)];
                visitor.coarse_cell(
                    coarse.len(),
                    col,
                    row,
                    coarse_layout.cell_width,
                    coarse_layout.cell_height,
                );
            }
        }
        for row in 0..layout.num_rows {
            for col in 0..layout.num_cols {
                let cell = &self.cells[layout.index(col, row)];
                if !cell.is_empty() {
                    visitor.loose_cell(cell.head, col, row, cell.bounds);
                }
            }
        }
    }

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

    /// Number of fine cell registrations held by a coarse cell.
    pub fn coarse_members(&self, col: u32, row: u32) -> usize {
        if !self.coarse_layout.contains_cell(col, row) {
            return 0;
        }
        self.coarse_cells[self.coarse_layout.index(col, row)].len()
    }

    /// Whether the coarse cell at `(coarse_col, coarse_row)` lists the fine
    /// cell at `(col, row)`.
    pub fn is_registered(&self, col: u32, row: u32, coarse_col: u32, coarse_row: u32) -> bool {
        if !self.layout.contains_cell(col, row)
            || !self.coarse_layout.contains_cell(coarse_col, coarse_row)
        {
            return false;
        }
        let cell_index = self.layout.index(col, row) as u32;
        self.coarse_cells[self.coarse_layout.index(coarse_col, coarse_row)]
            .iter()
            .any(|(_, &registered)| registered == cell_index)
    }

    pub fn cell_coords(&self, x: f32, y: f32) -> (u32, u32) {
        (self.layout.col(x), self.layout.row(y))
    }

    pub fn coarse_coords(&self, x: f32, y: f32) -> (u32, u32) {
        (self.coarse_layout.col(x), self.coarse_layout.row(y))
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

    fn insert_to_cell<S: EltStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: EltIndex,
        col: u32,
        row: u32,
    ) {
        let cell_index = self.layout.index(col, row);
        let cell = &mut self.cells[cell_index];
        if cell.is_empty() {
            cell.push(store, index);
            let range = self.coarse_layout.range(&cell.bounds);
            self.register(cell_index, range, None);
        } else {
            push_elt(&mut cell.head, store, index);
            let bounds = store.elt(index).bounds();
            self.expand_cell(cell_index, &bounds);
        }
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

    /// Grows a non-empty fine cell to include `bounds` and registers it in the
    /// coarse cells it newly overlaps.
    fn expand_cell(&mut self, cell_index: usize, bounds: &Aabb) {
        let cell = &mut self.cells[cell_index];
        let before = self.coarse_layout.range(&cell.bounds);
        cell.bounds.expand_to_include(bounds);
        let after = self.coarse_layout.range(&cell.bounds);
        if after != before {
            self.register(cell_index, after, Some(before));
        }
    }

    /// Adds the fine cell to every coarse cell in `range` outside `skip`.
    fn register(&mut self, cell_index: usize, range: CellRange, skip: Option<CellRange>) -> usize {
        let mut added = 0;
        for row in range.min_row..=range.max_row {
            for col in range.min_col..=range.max_col {
                if skip.map_or(false, |skip| skip.contains(col, row)) {
                    continue;
                }
                let coarse_index = self.coarse_layout.index(col, row);
                self.coarse_cells[coarse_index].insert_first(cell_index as u32);
                added += 1;
            }
        }
        added
    }

    fn next_query_tick(&mut self) -> u32 {
        self.query_tick = self.query_tick.wrapping_add(1);
        if self.query_tick == 0 {
            for cell in self.cells.iter_mut() {
                cell.query_mark = 0;
            }
            self.query_tick = 1;
        }
        self.query_tick
    }
}

impl SpatialGrid for LooseDoubleGrid {
    fn insert<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) {
        LooseDoubleGrid::insert(self, store, index)
    }

    fn remove<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) -> GridResult<()> {
        LooseDoubleGrid::remove(self, store, index)
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
        LooseDoubleGrid::relocate(self, store, index, from_x, from_y, to_x, to_y)
    }

    fn query_with<S, F>(&mut self, store: &S, area: Aabb, omit: Option<u32>, f: F)
    where
        S: EltStore + ?Sized,
        F: FnMut(EltIndex),
    {
        LooseDoubleGrid::query_with(self, store, area, omit, f)
    }

    fn tighten<S: EltStore + ?Sized>(&mut self, store: &S) {
        LooseDoubleGrid::tighten(self, store)
    }

    fn len(&self) -> usize {
        self.len
    }
}
