use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::animation::ease::Easing;
use crate::animation::transform::{Animation, AnimationProperty, AnimationValue};
use crate::app::config::AppConfig;
use crate::app::context::AppContext;
use crate::foundation::core::{Color, Vec2};
use crate::foundation::error::{WobbleError, WobbleResult};
use crate::graphics::geometry::{Alignment, ScalableVector2};
use crate::layer::manager::LayerId;
use crate::render::backend::BatchOptions;
use crate::scene::tree::DrawableId;

/// JSON description of a whole scene: config, textures, layers and the drawable tree.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDef {
    #[serde(default)]
    pub config: AppConfig,
    /// Texture name to pixel size.
    #[serde(default)]
    pub textures: BTreeMap<String, TextureDef>,
    /// Layers in creation order.
    #[serde(default)]
    pub layers: Vec<LayerDef>,
    /// Children of the root container.
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextureDef {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerDef {
    pub name: String,
    /// Layers this one draws above.
    #[serde(default)]
    pub above: Vec<String>,
    /// Layers this one draws beneath.
    #[serde(default)]
    pub below: Vec<String>,
}

/// What a node is.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Container,
    Sprite { texture: String },
    Text { text: String, font_size: f64 },
    Scroll { content_height: f64 },
    Button { texture: String },
}

fn default_alpha() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NodeDef {
    /// Unique name, reported back by [`SceneDef::build`].
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Option<ScalableVector2>,
    /// Defaults to the texture size for sprites and buttons, zero otherwise.
    #[serde(default)]
    pub size: Option<ScalableVector2>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub pivot: Option<Vec2>,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub tint: Option<Color>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub layer: Option<String>,
    #[serde(default)]
    pub batch: Option<BatchOptions>,
    #[serde(default)]
    pub use_previous_batch: bool,
    #[serde(default)]
    pub animations: Vec<AnimationDef>,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

/// Animation queued on a node at build time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationDef {
    pub property: AnimationProperty,
    #[serde(default = "default_easing")]
    pub easing: Easing,
    /// Start value; the node's current value when omitted.
    #[serde(default)]
    pub from: Option<AnimationValue>,
    pub to: AnimationValue,
    pub duration_ms: f64,
}

fn default_easing() -> Easing {
    Easing::Linear
}

/// Result of [`SceneDef::build`].
#[derive(Debug)]
pub struct BuiltScene {
    pub ctx: AppContext,
    /// Named nodes.
    pub names: BTreeMap<String, DrawableId>,
}

impl SceneDef {
    /// Parse a scene description.
    pub fn from_json_str(s: &str) -> WobbleResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| WobbleError::validation(format!("parse scene JSON: {e}")))
    }

    /// Read and parse a scene description file.
    pub fn from_path(path: impl AsRef<Path>) -> WobbleResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            WobbleError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| WobbleError::validation(format!("parse scene JSON: {e}")))
    }

    /// Populate a fresh [`AppContext`] from this description.
    ///
    /// Unknown texture or layer names and duplicate node names are validation errors.
    #[tracing::instrument(skip_all, fields(nodes = self.nodes.len(), layers = self.layers.len()))]
    pub fn build(&self) -> WobbleResult<BuiltScene> {
        let mut ctx = AppContext::new(self.config.clone())?;

        for (name, t) in &self.textures {
            ctx.textures.insert(name, t.width, t.height)?;
        }

        for l in &self.layers {
            ctx.layers
                .new_layer(&l.name)
                .map_err(|e| WobbleError::validation(format!("layer '{}': {e}", l.name)))?;
        }
        for l in &self.layers {
            let this = lookup_layer(&ctx, &l.name)?;
            for other in &l.above {
                let other = lookup_layer(&ctx, other)?;
                ctx.layers.require_above(this, other)?;
            }
            for other in &l.below {
                let other = lookup_layer(&ctx, other)?;
                ctx.layers.require_below(this, other)?;
            }
        }

        let mut names = BTreeMap::new();
        let root = ctx.scene.root();
        for node in &self.nodes {
            build_node(&mut ctx, &mut names, root, node)?;
        }
        tracing::debug!(drawables = ctx.scene.len(), "scene built");
        Ok(BuiltScene { ctx, names })
    }
}

fn lookup_layer(ctx: &AppContext, name: &str) -> WobbleResult<LayerId> {
    ctx.layers
        .layer(name)
        .ok_or_else(|| WobbleError::validation(format!("unknown layer '{name}'")))
}

fn build_node(
    ctx: &mut AppContext,
    names: &mut BTreeMap<String, DrawableId>,
    parent: DrawableId,
    def: &NodeDef,
) -> WobbleResult<DrawableId> {
    let texture = |ctx: &AppContext, name: &str| {
        ctx.textures
            .get(name)
            .ok_or_else(|| WobbleError::validation(format!("unknown texture '{name}'")))
    };
    let id = match &def.kind {
        NodeKind::Container => ctx.scene.create_container(),
        NodeKind::Sprite { texture: t } => {
            let t = texture(ctx, t)?;
            ctx.scene.create_sprite(t)
        }
        NodeKind::Text { text, font_size } => ctx.scene.create_text(text.clone(), *font_size),
        NodeKind::Scroll { content_height } => ctx.scene.create_scroll_container(
            def.size.unwrap_or(ScalableVector2::relative(1.0, 1.0)),
            *content_height,
        ),
        NodeKind::Button { texture: t } => {
            let t = texture(ctx, t)?;
            ctx.scene.create_button(t)
        }
    };
    ctx.scene.set_parent(id, Some(parent))?;

    if let Some(name) = &def.name {
        if names.insert(name.clone(), id).is_some() {
            return Err(WobbleError::validation(format!("duplicate node name '{name}'")));
        }
    }
    if let Some(position) = def.position {
        ctx.scene.set_position(id, position)?;
    }
    if let Some(size) = def.size {
        ctx.scene.set_size(id, size)?;
    }
    ctx.scene.set_alignment(id, def.alignment)?;

    let layer = match &def.layer {
        Some(name) => Some(lookup_layer(ctx, name)?),
        None => None,
    };
    if let Some(d) = ctx.scene.get_mut(id) {
        d.name = def.name.clone();
        if let Some(pivot) = def.pivot {
            d.pivot = pivot;
        }
        d.rotation = def.rotation;
        d.alpha = def.alpha.clamp(0.0, 1.0);
        if let Some(tint) = def.tint {
            d.tint = tint;
        }
        d.visible = def.visible;
        d.layer = layer;
        d.batch_options = def.batch.clone();
        d.use_previous_batch_options = def.use_previous_batch;
    }

    for a in &def.animations {
        let from = match a.from {
            Some(v) => v,
            None if a.property.is_color() => AnimationValue::Color(
                ctx.scene.get(id).map_or(Color::WHITE, |d| d.tint),
            ),
            None => AnimationValue::Scalar(ctx.scene.current_scalar(id, a.property)?),
        };
        let animation = Animation::new(a.property, a.easing, from, a.to, a.duration_ms)
            .map_err(|e| WobbleError::validation(format!("node {:?}: {e}", def.name)))?;
        ctx.scene.add_animation(id, animation)?;
    }

    let child_parent = ctx.scene.scroll_content(id).unwrap_or(id);
    for child in &def.children {
        build_node(ctx, names, child_parent, child)?;
    }
    Ok(id)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/description.rs"]
mod tests;
