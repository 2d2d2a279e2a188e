pub mod error;
pub mod grid;
pub mod storage;

pub use common::shapes;
