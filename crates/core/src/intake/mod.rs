//! Deterministic intake decisions over the typed entity state.
//!
//! Everything here is a pure function of the schema and the current
//! [`ShelfEntities`](crate::domain::entities::ShelfEntities). The language
//! model never decides sufficiency or what to ask next.

pub mod merge;
pub mod questions;
pub mod ranges;
pub mod sufficiency;

#[cfg(test)]
pub(crate) mod strategies;

pub use merge::merge;
pub use questions::next_questions;
pub use ranges::range_warnings;
pub use sufficiency::{is_sufficient, missing_required};
