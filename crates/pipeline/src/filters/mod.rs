//! Filter implementations for the recommendation pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_interacted;
pub mod excluded_items;

// Re-export for convenience
pub use already_interacted::AlreadyInteractedFilter;
pub use excluded_items::ExcludedItemsFilter;
