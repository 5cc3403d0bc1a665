use tokio::sync::watch;

use crate::model::SnippetCode;

/// Publishes the latest triple to anything previewing it
///
/// Backed by a `watch` channel: subscribers only ever see the newest value,
/// and a publish that leaves the triple unchanged wakes nobody.
#[derive(Debug)]
pub struct CodeSupplier {
    tx: watch::Sender<SnippetCode>,
}

impl CodeSupplier {
    pub fn new(initial: SnippetCode) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the triple; returns whether subscribers were notified
    pub fn publish(&self, code: SnippetCode) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == code {
                false
            } else {
                *current = code;
                true
            }
        })
    }

    /// Change part of the triple in place, notifying only on a real change
    pub fn update(&self, edit: impl FnOnce(&mut SnippetCode)) -> bool {
        self.tx.send_if_modified(|current| {
            let before = current.clone();
            edit(current);
            *current != before
        })
    }

    /// Snapshot of the current triple
    pub fn current(&self) -> SnippetCode {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SnippetCode> {
        self.tx.subscribe()
    }
}

impl Default for CodeSupplier {
    fn default() -> Self {
        Self::new(SnippetCode::default())
    }
}
