//! Per-item progress observation
//!
//! Every [`Source::iterate`](super::Source::iterate) pass is wrapped in a
//! [`Progress`] decorator that reports to the process-wide observer. The
//! observer is a side channel only: it sees items go by, it never changes them.

use super::ItemStream;
use crate::item::Item;
use eyre::Result;
use owo_colors::OwoColorize;
use std::sync::{Arc, RwLock};

/// Receives progress notifications, labeled with the producing source's name
pub trait ProgressObserver: Send + Sync {
    /// Called after each item is yielded, with the running count
    fn tick(&self, label: &str, count: u64);

    /// Called once when the source's stream is exhausted
    fn finish(&self, _label: &str, _count: u64) {}
}

/// Default observer: ticks at trace level, totals at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn tick(&self, label: &str, count: u64) {
        log::trace!("{}: {}", label, count);
    }

    fn finish(&self, label: &str, count: u64) {
        log::info!("{} produced {} item(s)", label.cyan(), count);
    }
}

static OBSERVER: RwLock<Option<Arc<dyn ProgressObserver>>> = RwLock::new(None);

/// Install a process-wide progress observer
pub fn set_observer(observer: Arc<dyn ProgressObserver>) {
    let mut slot = OBSERVER.write().unwrap_or_else(|e| e.into_inner());
    *slot = Some(observer);
}

/// Restore the default [`LogProgress`] observer
pub fn reset_observer() {
    let mut slot = OBSERVER.write().unwrap_or_else(|e| e.into_inner());
    *slot = None;
}

fn current_observer() -> Arc<dyn ProgressObserver> {
    let slot = OBSERVER.read().unwrap_or_else(|e| e.into_inner());
    match slot.as_ref() {
        Some(observer) => Arc::clone(observer),
        None => Arc::new(LogProgress),
    }
}

/// Decorator that forwards a stream unchanged while reporting progress
pub struct Progress<'a> {
    inner: ItemStream<'a>,
    label: String,
    count: u64,
    finished: bool,
    observer: Arc<dyn ProgressObserver>,
}

impl<'a> Progress<'a> {
    /// Wrap `inner`, reporting to the currently installed observer
    pub fn new(inner: ItemStream<'a>, label: impl Into<String>) -> Self {
        Self::with_observer(inner, label, current_observer())
    }

    /// Wrap `inner`, reporting to a specific observer
    pub fn with_observer(
        inner: ItemStream<'a>,
        label: impl Into<String>,
        observer: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            inner,
            label: label.into(),
            count: 0,
            finished: false,
            observer,
        }
    }
}

impl Iterator for Progress<'_> {
    type Item = Result<Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.inner.next() {
            Some(Ok(item)) => {
                self.count += 1;
                self.observer.tick(&self.label, self.count);
                Some(Ok(item))
            }
            Some(Err(err)) => Some(Err(err)),
            None => {
                self.finished = true;
                self.observer.finish(&self.label, self.count);
                None
            }
        }
    }
}
