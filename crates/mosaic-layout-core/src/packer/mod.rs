pub mod block;
pub mod grid;
pub mod page;

pub use block::BlockSizer;
pub use grid::{ColumnSpan, PageState};
pub use page::PagePacker;
