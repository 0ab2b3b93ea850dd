use std::fmt;
use std::sync::mpsc;

use crate::scene::tree::{DrawableId, Scene};

/// A change to apply to one drawable at the start of the next update.
pub type DeferredFn = Box<dyn FnOnce(&mut Scene, DrawableId) + Send>;

pub(crate) struct Deferred {
    pub(crate) target: DrawableId,
    pub(crate) apply: DeferredFn,
}

/// Thread-safe sender of deferred scene changes.
///
/// Workers never touch the scene directly; they post closures here and the scene applies them,
/// in posting order, before animating the next frame. Entries aimed at drawables destroyed in the
/// meantime are dropped.
#[derive(Clone)]
pub struct Mailbox {
    tx: mpsc::Sender<Deferred>,
}

impl fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox").finish_non_exhaustive()
    }
}

impl Mailbox {
    pub(crate) fn new(tx: mpsc::Sender<Deferred>) -> Self {
        Self { tx }
    }

    /// Queue `apply` for `target`. Returns `false` when the scene is gone.
    pub fn post(
        &self,
        target: DrawableId,
        apply: impl FnOnce(&mut Scene, DrawableId) + Send + 'static,
    ) -> bool {
        self.tx
            .send(Deferred {
                target,
                apply: Box::new(apply),
            })
            .is_ok()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mailbox.rs"]
mod tests;
