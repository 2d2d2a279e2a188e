use super::NIL;
use std::ops::{Index, IndexMut};

const MIN_CAPACITY: usize = 4;

/// A slot is either a live value or a link in the free chain.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot<T> {
    Occupied(T),
    Free(u32),
}

/// Index-stable arena. Removed slots are chained together and handed out
/// again (most recently freed first) before the backing store grows.
#[derive(Clone, Debug)]
pub struct FreeList<T> {
    slots: Vec<Slot<T>>,
    first_free: u32,
    len: usize,
}

impl<T> FreeList<T> {
    pub fn new() -> Self {
        Self::with_capacity(MIN_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.max(MIN_CAPACITY)),
            first_free: NIL,
            len: 0,
        }
    }

    /// Stores `value` and returns its index, reusing the head of the free
    /// chain when there is one.
    pub fn insert(&mut self, value: T) -> u32 {
        self.len += 1;
        if self.first_free != NIL {
            let index = self.first_free;
            let next = match &self.slots[index as usize] {
                Slot::Free(next) => *next,
                Slot::Occupied(_) => panic!("free chain points at occupied slot {}", index),
            };
            self.first_free = next;
            self.slots[index as usize] = Slot::Occupied(value);
            return index;
        }

        if self.slots.len() == self.slots.capacity() {
            let additional = self.slots.len().max(MIN_CAPACITY);
            self.slots.reserve_exact(additional);
        }
        let index = self.slots.len();
        debug_assert!(
            index < NIL as usize,
            "free list index {} collides with NIL",
            index
        );
        self.slots.push(Slot::Occupied(value));
        index as u32
    }

    /// Releases the slot at `index` and returns what it held. Free or
    /// out-of-range slots are left alone and yield `None`.
    pub fn remove_at(&mut self, index: u32) -> Option<T> {
        let slot = self.slots.get_mut(index as usize)?;
        if matches!(slot, Slot::Free(_)) {
            return None;
        }
        let old = std::mem::replace(slot, Slot::Free(self.first_free));
        self.first_free = index;
        self.len -= 1;
        match old {
            Slot::Occupied(value) => Some(value),
            Slot::Free(_) => None,
        }
    }

    /// Forgets every slot but keeps the allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.first_free = NIL;
        self.len = 0;
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        match self.slots.get(index as usize) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        match self.slots.get_mut(index as usize) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn slot(&self, index: u32) -> Option<&Slot<T>> {
        self.slots.get(index as usize)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever handed out, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied(value) => Some((index as u32, value)),
                Slot::Free(_) => None,
            })
    }
}

impl<T> Default for FreeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<u32> for FreeList<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: u32) -> &T {
        match &self.slots[index as usize] {
            Slot::Occupied(value) => value,
            Slot::Free(_) => panic!("free list slot {} is not occupied", index),
        }
    }
}

impl<T> IndexMut<u32> for FreeList<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: u32) -> &mut T {
        match &mut self.slots[index as usize] {
            Slot::Occupied(value) => value,
            Slot::Free(_) => panic!("free list slot {} is not occupied", index),
        }
    }
}
