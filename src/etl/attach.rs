//! Source composed with a chain of actions

use super::{Action, ItemStream, Source};

/// A source wrapped by an ordered chain of actions
///
/// Built by [`Source::attach`]. The wrapped source is borrowed, so the caller
/// keeps it and may attach it elsewhere. The actions are private copies,
/// reset when attached; every pass runs fresh clones of those copies, so
/// each [`iterate`](Source::iterate) starts from the same unstarted state.
///
/// An `Attached` is itself a [`Source`] and can be attached to again.
///
/// Sharing one source between attachments iterated concurrently is only as
/// safe as that source's own `produce`.
pub struct Attached<'s> {
    source: &'s dyn Source,
    actions: Vec<Box<dyn Action>>,
}

impl<'s> Attached<'s> {
    /// Wrap `source` with reset copies of `actions`
    pub fn new(source: &'s dyn Source, actions: &[&dyn Action]) -> Self {
        let actions = actions
            .iter()
            .map(|action| {
                let mut copy = action.clone_box();
                copy.reset();
                copy
            })
            .collect();
        Self { source, actions }
    }

    /// Number of actions in this layer of the chain
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when this layer attaches no actions
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Source for Attached<'_> {
    /// Fold the actions left to right over the wrapped source's stream
    fn produce(&self) -> ItemStream<'_> {
        let mut stream = self.source.iterate();
        for action in &self.actions {
            stream = action.clone_box().iter_from(stream);
        }
        stream
    }

    fn name(&self) -> String {
        format!("Attached({})", self.source.name())
    }

    /// The wrapped source already reports progress
    fn iterate(&self) -> ItemStream<'_> {
        self.produce()
    }
}
