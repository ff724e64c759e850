//! Concrete actions
//!
//! Stateless filters and augmenters live alongside stateful stages such as
//! deduplication and counting. All of them are `Clone` so pipelines can take
//! independent copies.

mod array_splitter;
mod dedup;
mod enumerate;
mod field_dropper;
mod field_match;
mod first_n;
mod meta_setter;

pub use array_splitter::ArraySplitter;
pub use dedup::Dedup;
pub use enumerate::Enumerate;
pub use field_dropper::FieldDropper;
pub use field_match::FieldMatch;
pub use first_n::FirstN;
pub use meta_setter::MetaSetter;
