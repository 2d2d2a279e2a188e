use super::*;
use crate::storage::FreeList;

/// Index of an element inside its caller-owned store.
pub type EltIndex = u32;

/// What a record must expose to live in a grid. The anchor is the bottom-left
/// corner of the bounding box and decides which cell holds the element.
///
/// `next_elt`/`set_next_elt` back the per-cell chain. While the element is
/// registered the link belongs to that grid and must not be touched by
/// anything else.
pub trait GridElt {
    fn id(&self) -> u32;
    fn left_x(&self) -> f32;
    fn bottom_y(&self) -> f32;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn next_elt(&self) -> EltIndex;
    fn set_next_elt(&mut self, next: EltIndex);

    #[inline(always)]
    fn bounds(&self) -> Aabb {
        Aabb::from_anchor(
            self.left_x(),
            self.bottom_y(),
            self.width() as f32,
            self.height() as f32,
        )
    }
}

/// Caller-owned element storage addressed by stable indices.
pub trait EltStore {
    type Elt: GridElt;

    fn elt(&self, index: EltIndex) -> &Self::Elt;
    fn elt_mut(&mut self, index: EltIndex) -> &mut Self::Elt;
}

impl<E: GridElt> EltStore for [E] {
    type Elt = E;

    #[inline(always)]
    fn elt(&self, index: EltIndex) -> &E {
        &self[index as usize]
    }

    #[inline(always)]
    fn elt_mut(&mut self, index: EltIndex) -> &mut E {
        &mut self[index as usize]
    }
}

impl<E: GridElt> EltStore for Vec<E> {
    type Elt = E;

    #[inline(always)]
    fn elt(&self, index: EltIndex) -> &E {
        &self[index as usize]
    }

    #[inline(always)]
    fn elt_mut(&mut self, index: EltIndex) -> &mut E {
        &mut self[index as usize]
    }
}

impl<E: GridElt> EltStore for FreeList<E> {
    type Elt = E;

    #[inline(always)]
    fn elt(&self, index: EltIndex) -> &E {
        &self[index]
    }

    #[inline(always)]
    fn elt_mut(&mut self, index: EltIndex) -> &mut E {
        &mut self[index]
    }
}

/// Plain element record for callers that have nothing richer to store.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Element {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub width: u32,
    pub height: u32,
    next: EltIndex,
}

impl Element {
    pub fn new(id: u32, x: f32, y: f32, width: u32, height: u32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            next: NIL,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }
}

impl GridElt for Element {
    #[inline(always)]
    fn id(&self) -> u32 {
        self.id
    }

    #[inline(always)]
    fn left_x(&self) -> f32 {
        self.x
    }

    #[inline(always)]
    fn bottom_y(&self) -> f32 {
        self.y
    }

    #[inline(always)]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline(always)]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline(always)]
    fn next_elt(&self) -> EltIndex {
        self.next
    }

    #[inline(always)]
    fn set_next_elt(&mut self, next: EltIndex) {
        self.next = next;
    }
}

/// Walks a cell chain starting at `head`.
pub struct CellElts<'a, S: EltStore + ?Sized> {
    store: &'a S,
    current: EltIndex,
}

impl<'a, S: EltStore + ?Sized> Iterator for CellElts<'a, S> {
    type Item = EltIndex;

    #[inline(always)]
    fn next(&mut self) -> Option<EltIndex> {
        if self.current == NIL {
            return None;
        }
        let index = self.current;
        self.current = self.store.elt(index).next_elt();
        Some(index)
    }
}

/// Iterates the element indices of a cell, e.g. from a traversal visitor.
pub fn cell_elts<S: EltStore + ?Sized>(store: &S, head: EltIndex) -> CellElts<'_, S> {
    CellElts {
        store,
        current: head,
    }
}

#[inline(always)]
pub(crate) fn push_elt<S: EltStore + ?Sized>(head: &mut EltIndex, store: &mut S, index: EltIndex) {
    store.elt_mut(index).set_next_elt(*head);
    *head = index;
}

/// Unlinks the element carrying `id` from the chain at `head`. Returns false,
/// leaving the chain untouched, when no element in the chain has that id.
pub(crate) fn unlink_elt<S: EltStore + ?Sized>(
    head: &mut EltIndex,
    store: &mut S,
    id: u32,
) -> bool {
    let mut prev = NIL;
    let mut current = *head;
    while current != NIL {
        let elt = store.elt(current);
        let next = elt.next_elt();
        if elt.id() == id {
            if prev == NIL {
                *head = next;
            } else {
                store.elt_mut(prev).set_next_elt(next);
            }
            store.elt_mut(current).set_next_elt(NIL);
            return true;
        }
        prev = current;
        current = next;
    }
    false
}
