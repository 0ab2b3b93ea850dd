use std::collections::BTreeMap;
use std::fmt;

use crate::assets::store::TextureId;
use crate::foundation::core::{Affine, Color, Point, Rect};
use crate::foundation::error::WobbleResult;

/// How the backend orders primitives inside one batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Queue primitives and submit them in call order when the batch ends.
    #[default]
    Deferred,
    /// Submit every primitive as soon as it is drawn.
    Immediate,
    /// Group primitives by texture.
    Texture,
    /// Sort by descending layer depth.
    BackToFront,
    /// Sort by ascending layer depth.
    FrontToBack,
}

/// Colour blending applied when compositing primitives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendState {
    /// Premultiplied alpha-over.
    #[default]
    AlphaBlend,
    /// Additive blending.
    Additive,
    /// Overwrite the destination.
    Opaque,
    /// Straight (non-premultiplied) alpha-over.
    NonPremultiplied,
}

/// Texture sampling filter and addressing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerState {
    /// Bilinear, clamped.
    #[default]
    LinearClamp,
    /// Bilinear, wrapping.
    LinearWrap,
    /// Nearest, clamped.
    PointClamp,
    /// Nearest, wrapping.
    PointWrap,
    /// Anisotropic, clamped.
    AnisotropicClamp,
}

/// Depth/stencil usage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthStencilState {
    /// No depth test.
    #[default]
    None,
    /// Depth test and write.
    Default,
    /// Depth test without write.
    DepthRead,
}

/// Triangle culling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullMode {
    /// Draw both faces.
    #[default]
    None,
    /// Cull clockwise faces.
    Clockwise,
    /// Cull counter-clockwise faces.
    CounterClockwise,
}

/// Rasterizer configuration, including the scissor rectangle used for clipping.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RasterizerState {
    /// Face culling.
    #[serde(default)]
    pub cull: CullMode,
    /// Scissor rectangle in screen space; `None` disables the scissor test.
    #[serde(default)]
    pub scissor: Option<Rect>,
}

/// Backend identifier of a compiled shader.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ShaderId(pub u32);

/// A shader and the uniform values it is bound with.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shader {
    /// Shader program.
    pub id: ShaderId,
    /// Named scalar parameters.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl Shader {
    /// Shader with no parameters.
    pub fn new(id: ShaderId) -> Self {
        Self {
            id,
            params: BTreeMap::new(),
        }
    }

    /// Builder-style parameter assignment.
    pub fn with_param(mut self, name: &str, value: f64) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }
}

/// Everything a batch is begun with. Two drawables can share a batch only when their
/// bundles compare equal.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BatchOptions {
    /// Primitive ordering.
    #[serde(default)]
    pub sort_mode: SortMode,
    /// Blending.
    #[serde(default)]
    pub blend: BlendState,
    /// Sampling.
    #[serde(default)]
    pub sampler: SamplerState,
    /// Depth/stencil.
    #[serde(default)]
    pub depth_stencil: DepthStencilState,
    /// Rasterizer, including scissor.
    #[serde(default)]
    pub rasterizer: RasterizerState,
    /// Optional shader override.
    #[serde(default)]
    pub shader: Option<Shader>,
}

impl BatchOptions {
    /// Same bundle with a different blend state.
    pub fn with_blend(mut self, blend: BlendState) -> Self {
        self.blend = blend;
        self
    }

    /// Same bundle with a different shader.
    pub fn with_shader(mut self, shader: Option<Shader>) -> Self {
        self.shader = shader;
        self
    }

    /// Same bundle clipped to `clip`, intersected with any existing scissor.
    pub fn clipped_to(mut self, clip: Rect) -> Self {
        self.rasterizer.scissor = Some(match self.rasterizer.scissor {
            Some(existing) => existing.intersect(clip),
            None => clip,
        });
        self
    }
}

/// Backend identifier of a private render target owned by one drawable.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RenderTargetId(pub u32);

/// Mirroring applied to a sprite quad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SpriteEffects {
    /// Mirror horizontally.
    #[serde(default)]
    pub flip_horizontal: bool,
    /// Mirror vertically.
    #[serde(default)]
    pub flip_vertical: bool,
}

/// One textured quad.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct QuadDraw {
    /// Texture to sample.
    pub texture: TextureId,
    /// Unrotated destination rectangle in screen space.
    pub dest: Rect,
    /// Source rectangle in texture pixels.
    pub source: Rect,
    /// Tint with effective alpha folded into the alpha channel.
    pub tint: Color,
    /// Accumulated rotation in radians.
    pub rotation: f64,
    /// Rotation/scale origin in screen space.
    pub origin: Point,
    /// Mirroring.
    pub effects: SpriteEffects,
    /// Depth value for depth-sorted batches.
    pub layer_depth: f32,
    /// Full render transform, applied to `dest`.
    pub transform: Affine,
}

/// One run of text. Glyph rasterization belongs to the backend.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextDraw {
    /// Text content.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Layout box in screen space.
    pub dest: Rect,
    /// Tint with effective alpha folded in.
    pub tint: Color,
    /// Full render transform.
    pub transform: Affine,
}

/// Release every id in `ids`, queueing the ones the backend refused onto `retry`.
///
/// All ids are attempted even after a failure. Returns how many were released, or the first
/// error once the whole list has been tried.
pub(crate) fn release_all<T: Copy + fmt::Debug>(
    ids: impl IntoIterator<Item = T>,
    retry: &mut Vec<T>,
    mut release: impl FnMut(T) -> WobbleResult<()>,
) -> WobbleResult<usize> {
    let mut released = 0;
    let mut first_err = None;
    for id in ids {
        match release(id) {
            Ok(()) => released += 1,
            Err(e) => {
                tracing::debug!(?id, error = %e, "backend release failed, retrying later");
                retry.push(id);
                first_err.get_or_insert(e);
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(released),
    }
}

/// Minimal contract the scene needs from a rendering backend.
///
/// Batches bracket primitives: `begin_batch` configures state, primitives queue, `end_batch`
/// flushes. Ending a batch that queued nothing must be a no-op, never an error.
pub trait RenderBackend {
    /// Begin a batch configured with `options`.
    fn begin_batch(&mut self, options: &BatchOptions) -> WobbleResult<()>;

    /// Flush and end the current batch.
    fn end_batch(&mut self) -> WobbleResult<()>;

    /// Queue a textured quad.
    fn draw_quad(&mut self, quad: &QuadDraw) -> WobbleResult<()>;

    /// Queue a run of text.
    fn draw_text(&mut self, text: &TextDraw) -> WobbleResult<()>;

    /// Release a render target previously owned by a destroyed drawable.
    fn release_render_target(&mut self, _id: RenderTargetId) -> WobbleResult<()> {
        Ok(())
    }

    /// Release a texture no drawable references anymore.
    fn release_texture(&mut self, _id: TextureId) -> WobbleResult<()> {
        Ok(())
    }
}
