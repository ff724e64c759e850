//! Core pipeline abstractions
//!
//! A [`Source`] produces a lazy stream of items, [`Action`]s transform that
//! stream stage by stage, and an [`Exporter`] drains it. Attaching actions
//! to a source yields another source, so pipelines compose recursively.

mod action;
mod attach;
mod export;
mod pipeline;
pub mod progress;
mod source;
pub mod stream;

pub use action::{Action, ActionClone, FlatApply};
pub use attach::Attached;
pub use export::Exporter;
pub use pipeline::Pipeline;
pub use progress::{LogProgress, Progress, ProgressObserver};
pub use source::Source;
pub use stream::{Emitted, ItemStream};
