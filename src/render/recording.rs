use crate::assets::store::TextureId;
use crate::foundation::error::{WobbleError, WobbleResult};
use crate::render::backend::{
    BatchOptions, QuadDraw, RenderBackend, RenderTargetId, TextDraw,
};

/// One call received by a [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderCall {
    /// `begin_batch`.
    BeginBatch(BatchOptions),
    /// `end_batch` on an open batch.
    EndBatch,
    /// `draw_quad`.
    Quad(QuadDraw),
    /// `draw_text`.
    Text(TextDraw),
    /// `release_render_target`.
    ReleaseRenderTarget(RenderTargetId),
    /// `release_texture`.
    ReleaseTexture(TextureId),
}

/// In-memory backend that records every call, for tests and debugging.
///
/// Drawing outside a batch is reported as a render error, mirroring what real backends do.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Vec<RenderCall>,
    open: bool,
}

impl RecordingBackend {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the recorded calls.
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Take the recorded calls, leaving the recorder empty.
    pub fn take_calls(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.calls)
    }

    /// Recorded quads in submission order.
    pub fn quads(&self) -> impl Iterator<Item = &QuadDraw> + '_ {
        self.calls.iter().filter_map(|c| match c {
            RenderCall::Quad(q) => Some(q),
            _ => None,
        })
    }

    /// Number of batches begun.
    pub fn batch_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::BeginBatch(_)))
            .count()
    }

    fn require_open(&self, what: &str) -> WobbleResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(WobbleError::render(format!("{what} outside of a batch")))
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn begin_batch(&mut self, options: &BatchOptions) -> WobbleResult<()> {
        if self.open {
            return Err(WobbleError::render("begin_batch while a batch is open"));
        }
        self.open = true;
        self.calls.push(RenderCall::BeginBatch(options.clone()));
        Ok(())
    }

    fn end_batch(&mut self) -> WobbleResult<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.calls.push(RenderCall::EndBatch);
        Ok(())
    }

    fn draw_quad(&mut self, quad: &QuadDraw) -> WobbleResult<()> {
        self.require_open("draw_quad")?;
        self.calls.push(RenderCall::Quad(quad.clone()));
        Ok(())
    }

    fn draw_text(&mut self, text: &TextDraw) -> WobbleResult<()> {
        self.require_open("draw_text")?;
        self.calls.push(RenderCall::Text(text.clone()));
        Ok(())
    }

    fn release_render_target(&mut self, id: RenderTargetId) -> WobbleResult<()> {
        self.calls.push(RenderCall::ReleaseRenderTarget(id));
        Ok(())
    }

    fn release_texture(&mut self, id: TextureId) -> WobbleResult<()> {
        self.calls.push(RenderCall::ReleaseTexture(id));
        Ok(())
    }
}
