use super::{FreeList, NIL};

#[derive(Clone, Debug)]
struct Bucket<T> {
    value: T,
    next: u32,
}

/// Singly-linked list whose nodes live in a [`FreeList`]. Node indices stay
/// valid until the node is removed. There are no back links, so anything that
/// needs a predecessor walks from the head.
#[derive(Clone, Debug)]
pub struct BucketList<T> {
    nodes: FreeList<Bucket<T>>,
    head: u32,
}

impl<T> BucketList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: FreeList::with_capacity(capacity),
            head: NIL,
        }
    }

    #[inline(always)]
    pub fn head(&self) -> u32 {
        self.head
    }

    #[inline(always)]
    pub fn next(&self, index: u32) -> u32 {
        self.nodes[index].next
    }

    #[inline(always)]
    pub fn get(&self, index: u32) -> &T {
        &self.nodes[index].value
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head == NIL
    }

    pub fn insert_first(&mut self, value: T) -> u32 {
        let index = self.nodes.insert(Bucket {
            value,
            next: self.head,
        });
        self.head = index;
        index
    }

    pub fn insert_after(&mut self, value: T, index: u32) -> u32 {
        let next = self.nodes[index].next;
        let new_index = self.nodes.insert(Bucket { value, next });
        self.nodes[index].next = new_index;
        new_index
    }

    /// O(n) in list length.
    pub fn insert_before(&mut self, value: T, index: u32) -> u32 {
        if index == self.head {
            return self.insert_first(value);
        }
        let prev = self.find_prev(index);
        let new_index = self.nodes.insert(Bucket { value, next: index });
        self.nodes[prev].next = new_index;
        new_index
    }

    /// Unlinks the node at `index` and returns its value. O(n) in list length.
    pub fn remove(&mut self, index: u32) -> T {
        if index == self.head {
            let bucket = self.release(index);
            self.head = bucket.next;
            return bucket.value;
        }
        let prev = self.find_prev(index);
        self.remove_after(prev)
    }

    /// Unlinks the successor of `index` and returns its value.
    pub fn remove_after(&mut self, index: u32) -> T {
        let target = self.nodes[index].next;
        assert!(target != NIL, "bucket {} has no successor", index);
        let bucket = self.release(target);
        self.nodes[index].next = bucket.next;
        bucket.value
    }

    /// Raw link surgery, meant to be paired with [`BucketList::erase`].
    #[inline(always)]
    pub fn set_next(&mut self, index: u32, next: u32) {
        self.nodes[index].next = next;
    }

    /// Frees the node without touching any link. The caller must already have
    /// pointed the predecessor (or the head) past it.
    pub fn erase(&mut self, index: u32) {
        self.nodes.remove_at(index);
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = NIL;
    }

    pub fn iter(&self) -> BucketIter<'_, T> {
        BucketIter {
            list: self,
            current: self.head,
        }
    }

    fn release(&mut self, index: u32) -> Bucket<T> {
        match self.nodes.remove_at(index) {
            Some(bucket) => bucket,
            None => panic!("bucket {} is not in the list", index),
        }
    }

    fn find_prev(&self, index: u32) -> u32 {
        let mut prev = self.head;
        loop {
            if prev == NIL {
                panic!("bucket {} is not in the list", index);
            }
            let next = self.nodes[prev].next;
            if next == index {
                return prev;
            }
            prev = next;
        }
    }
}

impl<T> Default for BucketList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BucketIter<'a, T> {
    list: &'a BucketList<T>,
    current: u32,
}

impl<'a, T> Iterator for BucketIter<'a, T> {
    type Item = (u32, &'a T);

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NIL {
            return None;
        }
        let index = self.current;
        let bucket = &self.list.nodes[index];
        self.current = bucket.next;
        Some((index, &bucket.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &BucketList<u32>) -> Vec<u32> {
        list.iter().map(|(_, value)| *value).collect()
    }

    #[test]
    fn insert_first_prepends() {
        let mut list = BucketList::new();
        assert!(list.is_empty());
        list.insert_first(1);
        list.insert_first(2);
        list.insert_first(3);
        assert_eq!(values(&list), vec![3, 2, 1]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn splices_around_existing_nodes() {
        let mut list = BucketList::new();
        let one = list.insert_first(1);
        let three = list.insert_after(3, one);
        list.insert_before(2, three);
        list.insert_before(0, one);
        list.insert_after(4, three);
        assert_eq!(values(&list), vec![0, 1, 2, 3, 4]);
        assert_eq!(*list.get(three), 3);
    }

    #[test]
    fn remove_head_middle_and_tail() {
        let mut list = BucketList::new();
        let c = list.insert_first(3);
        let b = list.insert_first(2);
        let a = list.insert_first(1);

        assert_eq!(list.remove(b), 2);
        assert_eq!(values(&list), vec![1, 3]);
        assert_eq!(list.remove(a), 1);
        assert_eq!(values(&list), vec![3]);
        assert_eq!(list.head(), c);
        assert_eq!(list.remove(c), 3);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn removed_slots_are_recycled() {
        let mut list = BucketList::new();
        let a = list.insert_first(1);
        list.insert_first(2);
        list.remove(a);
        assert_eq!(list.insert_first(5), a);
        assert_eq!(values(&list), vec![5, 2]);
    }

    #[test]
    fn remove_after_and_erase() {
        let mut list = BucketList::new();
        let a = list.insert_first(1);
        let b = list.insert_after(2, a);
        let c = list.insert_after(3, b);

        assert_eq!(list.remove_after(a), 2);
        assert_eq!(values(&list), vec![1, 3]);

        let d = list.insert_after(4, c);
        list.set_next(a, d);
        list.erase(c);
        assert_eq!(values(&list), vec![1, 4]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.insert_first(0), c);
    }

    #[test]
    fn clear_resets_head() {
        let mut list = BucketList::with_capacity(16);
        for i in 0..10 {
            list.insert_first(i);
        }
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
        assert_eq!(list.insert_first(42), 0);
    }

    #[test]
    #[should_panic(expected = "is not in the list")]
    fn remove_missing_index_panics() {
        let mut list = BucketList::new();
        list.insert_first(1);
        list.insert_first(2);
        list.remove(7);
    }

    #[test]
    #[should_panic(expected = "is not in the list")]
    fn insert_before_missing_index_panics() {
        let mut list: BucketList<u32> = BucketList::new();
        list.insert_before(1, 3);
    }

    #[test]
    #[should_panic(expected = "has no successor")]
    fn remove_after_tail_panics() {
        let mut list = BucketList::new();
        let a = list.insert_first(1);
        list.remove_after(a);
    }
}
