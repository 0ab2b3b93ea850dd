use std::sync::Arc;

use crate::animation::transform::Animation;
use crate::assets::store::Texture;
use crate::foundation::core::{Color, Rect, Size, Vec2};
use crate::graphics::geometry::{Alignment, ScalableVector2, align_rect};
use crate::layer::manager::LayerId;
use crate::render::backend::{BatchOptions, RenderTargetId, SpriteEffects};
use crate::ui::button::Clickable;
use crate::ui::scroll::Scrollable;

/// Textured quad content.
#[derive(Clone, Debug)]
pub struct Sprite {
    /// Shared texture; never owned exclusively by the drawable.
    pub texture: Arc<Texture>,
    /// Source rectangle in texture pixels; `None` samples the whole texture.
    pub source: Option<Rect>,
    /// Mirroring.
    pub effects: SpriteEffects,
    /// Depth for depth-sorted batches.
    pub layer_depth: f32,
}

impl Sprite {
    /// Sprite sampling the whole texture.
    pub fn new(texture: Arc<Texture>) -> Self {
        Self {
            texture,
            source: None,
            effects: SpriteEffects::default(),
            layer_depth: 0.0,
        }
    }
}

/// Text content; glyphs are produced by the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// String to draw.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
}

/// What, if anything, a drawable paints itself.
#[derive(Clone, Debug, Default)]
pub enum Content {
    /// Grouping only.
    #[default]
    None,
    /// A textured quad.
    Sprite(Sprite),
    /// A run of text.
    Text(Text),
}

/// A node of the scene tree.
///
/// Geometry (position, size, alignment) is read here but written through [`crate::Scene`] so the
/// cached absolute rectangles of the node and its subtree are invalidated. Everything else can be
/// changed directly through [`crate::Scene::get_mut`].
#[derive(Debug)]
pub struct Drawable {
    pub(crate) position: ScalableVector2,
    pub(crate) size: ScalableVector2,
    pub(crate) alignment: Alignment,

    /// Rotation/scale origin in unit-square coordinates of the drawable.
    pub pivot: Vec2,
    /// Rotation in radians, applied around the pivot when drawing.
    pub rotation: f64,
    /// Scale applied around the pivot when drawing.
    pub scale: Vec2,
    /// Opacity in `[0, 1]`, multiplied down the tree.
    pub alpha: f64,
    /// Tint colour.
    pub tint: Color,
    /// Hidden drawables and their subtrees are not drawn (they still update).
    pub visible: bool,
    /// Draw layer; `None` inherits the nearest layered ancestor.
    pub layer: Option<LayerId>,
    /// Batch state this drawable requires.
    pub batch_options: Option<BatchOptions>,
    /// Reuse the previously drawn bundle when `batch_options` is `None`.
    pub use_previous_batch_options: bool,
    /// Diagnostic name.
    pub name: Option<String>,
    /// Painted content.
    pub content: Content,

    pub(crate) animations: Vec<Animation>,
    pub(crate) clickable: Option<Clickable>,
    pub(crate) scrollable: Option<Scrollable>,
    pub(crate) render_target: Option<RenderTargetId>,
}

impl Drawable {
    pub(crate) fn new(content: Content) -> Self {
        Self {
            position: ScalableVector2::default(),
            size: ScalableVector2::default(),
            alignment: Alignment::TopLeft,
            pivot: Vec2::new(0.5, 0.5),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            alpha: 1.0,
            tint: Color::WHITE,
            visible: true,
            layer: None,
            batch_options: None,
            use_previous_batch_options: false,
            name: None,
            content,
            animations: Vec::new(),
            clickable: None,
            scrollable: None,
            render_target: None,
        }
    }

    /// Position offset relative to the alignment anchor.
    pub fn position(&self) -> ScalableVector2 {
        self.position
    }

    /// Size relative to the parent.
    pub fn size(&self) -> ScalableVector2 {
        self.size
    }

    /// Anchor on the parent rectangle.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Pending animations in application order.
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    /// Whether this drawable reacts to pointer input.
    pub fn is_clickable(&self) -> bool {
        self.clickable.is_some()
    }

    /// Render target owned by this drawable, released when it is destroyed.
    pub fn render_target(&self) -> Option<RenderTargetId> {
        self.render_target
    }

    /// Resolve the absolute rectangle against an already-resolved parent rectangle.
    pub(crate) fn resolve_rect(&self, parent: Rect) -> Rect {
        let parent_size: Size = parent.size();
        align_rect(
            self.alignment,
            parent,
            self.position.resolve_offset(parent_size),
            self.size.resolve_size(parent_size),
        )
    }
}
