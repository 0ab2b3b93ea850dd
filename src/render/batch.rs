use crate::foundation::core::Rect;
use crate::foundation::error::WobbleResult;
use crate::render::backend::{BatchOptions, RenderBackend};

/// Counters describing how well a frame batched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BatchStats {
    /// Batches begun.
    pub batches: u32,
    /// Batches ended early because the next primitive needed different state.
    pub restarts: u32,
    /// Primitives drawn.
    pub primitives: u32,
}

impl std::ops::AddAssign for BatchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.batches += rhs.batches;
        self.restarts += rhs.restarts;
        self.primitives += rhs.primitives;
    }
}

/// How a drawable picks the bundle it is drawn with.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BatchRequest<'a> {
    /// Bundle declared on the drawable itself.
    pub(crate) own: Option<&'a BatchOptions>,
    /// Reuse whatever bundle is active when nothing is declared.
    pub(crate) use_previous: bool,
    /// Scissor inherited from enclosing scroll viewports.
    pub(crate) clip: Option<Rect>,
}

/// Tracks the bundle active on the backend and restarts batches only on change.
///
/// Batches begin lazily, right before the first primitive that needs them, so a batch is never
/// opened without something to draw.
#[derive(Debug, Default)]
pub struct BatchTracker {
    active: Option<BatchOptions>,
    queued: u32,
    stats: BatchStats,
}

impl BatchTracker {
    /// Tracker with no open batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle of the open batch, if any.
    pub fn active(&self) -> Option<&BatchOptions> {
        self.active.as_ref()
    }

    /// Counters accumulated since construction.
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// Work out the bundle a drawable is drawn with.
    pub(crate) fn effective(&self, req: BatchRequest<'_>, default: &BatchOptions) -> BatchOptions {
        match (req.own, req.use_previous, self.active.as_ref()) {
            (Some(own), _, _) => match req.clip {
                Some(clip) => own.clone().clipped_to(clip),
                None => own.clone(),
            },
            // The scissor comes from this drawable's position in the tree, never from the
            // previously drawn neighbour.
            (None, true, Some(active)) => {
                let mut inherited = active.clone();
                inherited.rasterizer.scissor = req.clip;
                inherited
            }
            _ => {
                let mut base = default.clone();
                if let Some(clip) = req.clip {
                    base = base.clipped_to(clip);
                }
                base
            }
        }
    }

    /// Make sure a batch configured with `options` is open.
    ///
    /// Returns `true` when a batch was begun, either the first one or a restart.
    pub fn prepare(
        &mut self,
        backend: &mut dyn RenderBackend,
        options: &BatchOptions,
    ) -> WobbleResult<bool> {
        if self.active.as_ref() == Some(options) {
            return Ok(false);
        }
        if self.active.is_some() {
            self.end(backend)?;
            self.stats.restarts += 1;
            tracing::trace!(restarts = self.stats.restarts, "batch state changed, restarting");
        }
        backend.begin_batch(options)?;
        self.active = Some(options.clone());
        self.stats.batches += 1;
        Ok(true)
    }

    /// Count one primitive queued into the open batch.
    pub fn record_primitive(&mut self) {
        self.queued += 1;
        self.stats.primitives += 1;
    }

    /// End the open batch, if any.
    pub fn finish(&mut self, backend: &mut dyn RenderBackend) -> WobbleResult<()> {
        self.end(backend)
    }

    fn end(&mut self, backend: &mut dyn RenderBackend) -> WobbleResult<()> {
        if self.active.take().is_none() {
            return Ok(());
        }
        if self.queued == 0 {
            tracing::trace!("ending empty batch");
        }
        self.queued = 0;
        backend.end_batch()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/batch.rs"]
mod tests;
