use super::*;

/// Receives the layout of a [`UniformGrid`](super::UniformGrid) followed by
/// every non-empty cell. Walk a cell with [`cell_elts`](super::cell_elts).
pub trait UniformGridVisitor {
    fn grid(&mut self, width: f32, height: f32, cell_width: f32, cell_height: f32);
    fn cell(&mut self, head: EltIndex, col: u32, row: u32, cell_width: f32, cell_height: f32);
}

/// Traversal hooks for the loose grids. The coarse callbacks only fire for
/// [`LooseDoubleGrid`](super::LooseDoubleGrid).
pub trait LooseGridVisitor {
    fn loose_grid(
        &mut self,
        width: f32,
        height: f32,
        cell_width: f32,
        cell_height: f32,
        offset_x: f32,
        offset_y: f32,
    );

    /// `bounds` is the loose box as of the call, possibly wider than its
    /// members until the next tighten.
    fn loose_cell(&mut self, head: EltIndex, col: u32, row: u32, bounds: Aabb);

    fn coarse_grid(&mut self, _width: f32, _height: f32, _cell_width: f32, _cell_height: f32) {}

    /// `members` is the number of fine cells registered in the coarse cell.
    fn coarse_cell(
        &mut self,
        _members: usize,
        _col: u32,
        _row: u32,
        _cell_width: f32,
        _cell_height: f32,
    ) {
    }
}
