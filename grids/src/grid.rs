mod cells;
mod config;
mod element;
mod loose_double;
mod loose_tight;
mod uniform;
mod visitor;

use crate::error::{GridError, GridResult};
use crate::storage::NIL;
use common::shapes::Aabb;
use log::debug;

use cells::{validate_cell_size, CellLayout, CellRange, LooseCell};
use config::ProfileBudget;
use element::{push_elt, unlink_elt};

pub use config::Config;
pub use element::{cell_elts, CellElts, Element, EltIndex, EltStore, GridElt};
pub use loose_double::LooseDoubleGrid;
pub use loose_tight::LooseTightGrid;
pub use uniform::UniformGrid;
pub use visitor::{LooseGridVisitor, UniformGridVisitor};

/// The surface a tick loop drives: register, move and drop elements, ask what
/// overlaps a rectangle, and tighten once all moves for the tick are applied.
///
/// `relocate` expects the element in `store` to already sit at its new
/// position; `from_*`/`to_*` are the old and new anchors.
pub trait SpatialGrid {
    fn insert<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex);

    fn remove<S: EltStore + ?Sized>(&mut self, store: &mut S, index: EltIndex) -> GridResult<()>;

    fn relocate<S: EltStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: EltIndex,
        from_x: f32,
        from_y: f32,
        to_x: f32,
        to_y: f32,
    ) -> GridResult<()>;

    fn query_with<S, F>(&mut self, store: &S, area: Aabb, omit: Option<u32>, f: F)
    where
        S: EltStore + ?Sized,
        F: FnMut(EltIndex);

    /// Clears `results` and fills it with every match.
    fn query<S: EltStore + ?Sized>(
        &mut self,
        store: &S,
        area: Aabb,
        omit: Option<u32>,
        results: &mut Vec<EltIndex>,
    ) {
        results.clear();
        self.query_with(store, area, omit, |index| results.push(index));
    }

    fn tighten<S: EltStore + ?Sized>(&mut self, store: &S);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
