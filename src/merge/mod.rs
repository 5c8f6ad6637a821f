pub mod compare;
pub mod sorted;

// Re-export commonly used types
pub use compare::{ascending_by, by_id, by_timestamp};
pub use sorted::{MergeSorted, MergeSortedIter, merge_sorted};
