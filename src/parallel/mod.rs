pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, map_ordered, map_ordered_with_progress};
pub use pool::WorkerPool;
