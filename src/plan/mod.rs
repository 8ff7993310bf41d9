//! Turning page range expressions into concrete page layouts.

pub mod merge;
pub mod split;

pub use merge::{plan_merge, MergeEntry, MergePlan};
pub use split::{plan_split, SplitMode, SplitPlan};
