//! Wobble is a retained-mode 2D scene graph for games and tools.
//!
//! Drawables live in a generational arena owned by a [`Scene`]:
//!
//! - Lay them out with parent-relative [`ScalableVector2`] offsets and a 9-way [`Alignment`]
//! - Animate their properties with [`Easing`] curves
//! - Order them with [`LayerManager`] constraints
//! - Draw them through any [`RenderBackend`], restarting batches only when render state changes
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod app;
pub(crate) mod assets;
pub(crate) mod graphics;
pub(crate) mod layer;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod task;
pub(crate) mod ui;

pub use crate::foundation::core::{Affine, Color, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{WobbleError, WobbleResult};
pub use crate::foundation::time::GameTime;

pub use crate::animation::ease::Easing;
pub use crate::animation::transform::{
    Animation, AnimationProperty, AnimationValue, CompletionCallback,
};
pub use crate::app::config::AppConfig;
pub use crate::app::context::AppContext;
pub use crate::app::screen::{Screen, ScreenContext, ScreenManager, ScreenRegistry};
pub use crate::assets::store::{Texture, TextureId, TextureStore};
pub use crate::graphics::geometry::{
    Alignment, ScalableVector1, ScalableVector2, align_rect, pivot_transform,
};
pub use crate::layer::manager::{LayerId, LayerManager};
pub use crate::render::backend::{
    BatchOptions, BlendState, CullMode, DepthStencilState, QuadDraw, RasterizerState,
    RenderBackend, RenderTargetId, SamplerState, Shader, ShaderId, SortMode, SpriteEffects,
    TextDraw,
};
pub use crate::render::batch::{BatchStats, BatchTracker};
pub use crate::render::recording::{RecordingBackend, RenderCall};
pub use crate::scene::description::{
    AnimationDef, BuiltScene, LayerDef, NodeDef, NodeKind, SceneDef, TextureDef,
};
pub use crate::scene::drawable::{Content, Drawable, Sprite, Text};
pub use crate::scene::mailbox::{DeferredFn, Mailbox};
pub use crate::scene::tree::{DrawableId, Scene};
pub use crate::task::handler::{CancellationToken, TaskEvent, TaskHandler};
pub use crate::ui::button::ButtonEvent;
pub use crate::ui::input::{InputSource, PointerButton, PointerState};
