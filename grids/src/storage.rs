mod bucket_list;
mod free_list;

pub use bucket_list::{BucketIter, BucketList};
pub use free_list::{FreeList, Slot};

/// Terminates free chains, bucket lists and per-cell element chains.
pub const NIL: u32 = u32::MAX;
