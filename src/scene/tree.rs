use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc;

use smallvec::SmallVec;

use crate::animation::ease::Easing;
use crate::animation::transform::{
    Animation, AnimationProperty, AnimationValue, CompletionCallback,
};
use crate::assets::store::Texture;
use crate::foundation::core::{Affine, Color, Rect};
use crate::foundation::error::{WobbleError, WobbleResult};
use crate::foundation::time::GameTime;
use crate::graphics::geometry::{Alignment, ScalableVector2, pivot_transform};
use crate::render::backend::{BatchOptions, RenderTargetId};
use crate::scene::drawable::{Content, Drawable, Sprite, Text};
use crate::scene::mailbox::{Deferred, Mailbox};
use crate::ui::button::ButtonTracker;

/// Generational handle to a drawable.
///
/// A handle stays valid until the drawable is destroyed; after that it never resolves again, even
/// when its slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl DrawableId {
    /// Slot index.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawableId({}v{})", self.index, self.generation)
    }
}

pub(crate) struct Node {
    pub(crate) drawable: Drawable,
    pub(crate) parent: Option<DrawableId>,
    pub(crate) children: Vec<DrawableId>,
    // A dirty node implies every descendant is dirty.
    dirty: Cell<bool>,
    absolute: Cell<Rect>,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owner of every drawable and of the parent/child relation between them.
///
/// The scene always has a root container filling the root rectangle (the virtual screen). Only
/// the root's subtree is updated and drawn; drawables created detached stay inert until attached.
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    root: DrawableId,
    root_rect: Rect,
    pub(crate) default_batch: BatchOptions,
    pub(crate) pending_release: Vec<RenderTargetId>,
    pub(crate) buttons: ButtonTracker,
    completions: Vec<(DrawableId, CompletionCallback)>,
    mailbox_tx: mpsc::Sender<Deferred>,
    mailbox_rx: mpsc::Receiver<Deferred>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("live", &self.live)
            .field("root", &self.root)
            .field("root_rect", &self.root_rect)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Empty scene whose root container fills `root_rect`.
    pub fn new(root_rect: Rect) -> Self {
        let (mailbox_tx, mailbox_rx) = mpsc::channel();
        let mut scene = Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            root: DrawableId {
                index: 0,
                generation: 0,
            },
            root_rect,
            default_batch: BatchOptions::default(),
            pending_release: Vec::new(),
            buttons: ButtonTracker::default(),
            completions: Vec::new(),
            mailbox_tx,
            mailbox_rx,
        };
        let mut root = Drawable::new(Content::None);
        root.size = ScalableVector2::relative(1.0, 1.0);
        root.name = Some("root".to_owned());
        scene.root = scene.insert(root);
        scene
    }

    /// Root container.
    pub fn root(&self) -> DrawableId {
        self.root
    }

    /// Rectangle the root resolves against.
    pub fn root_rect(&self) -> Rect {
        self.root_rect
    }

    /// Resize the virtual screen.
    pub fn set_root_rect(&mut self, rect: Rect) {
        if self.root_rect == rect {
            return;
        }
        self.root_rect = rect;
        let tops: SmallVec<[u32; 8]> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match &s.node {
                Some(n) if n.parent.is_none() => Some(i as u32),
                _ => None,
            })
            .collect();
        for i in tops {
            self.invalidate(i);
        }
    }

    /// Bundle used by drawables that neither declare nor inherit one.
    pub fn default_batch(&self) -> &BatchOptions {
        &self.default_batch
    }

    /// Replace the default bundle.
    pub fn set_default_batch(&mut self, options: BatchOptions) {
        self.default_batch = options;
    }

    /// Live drawables, the root included.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Never `true`; the root is permanent.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether `id` still refers to a live drawable.
    pub fn contains(&self, id: DrawableId) -> bool {
        self.node_ref(id).is_some()
    }

    /// Drawable behind `id`.
    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.node_ref(id).map(|n| &n.drawable)
    }

    /// Mutable access to everything except geometry, which goes through the `set_*` methods.
    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.node_mut(id).map(|n| &mut n.drawable)
    }

    /// Parent of `id`, `None` for the root and detached drawables.
    pub fn parent(&self, id: DrawableId) -> Option<DrawableId> {
        self.node_ref(id).and_then(|n| n.parent)
    }

    /// Children of `id` in insertion order.
    pub fn children(&self, id: DrawableId) -> &[DrawableId] {
        self.node_ref(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Parentless drawables: the root first, then detached ones in slot order.
    pub fn roots(&self) -> Vec<DrawableId> {
        let mut out = vec![self.root];
        out.extend(
            self.slots
                .iter()
                .enumerate()
                .filter(|(i, s)| {
                    *i as u32 != self.root.index
                        && s.node.as_ref().is_some_and(|n| n.parent.is_none())
                })
                .map(|(i, s)| DrawableId {
                    index: i as u32,
                    generation: s.generation,
                }),
        );
        out
    }

    /// Handle for posting deferred changes from other threads.
    pub fn mailbox(&self) -> Mailbox {
        Mailbox::new(self.mailbox_tx.clone())
    }

    // ----- creation ---------------------------------------------------------------------------

    /// Create a detached container.
    pub fn create_container(&mut self) -> DrawableId {
        self.insert(Drawable::new(Content::None))
    }

    /// Create a detached sprite sized to its texture.
    pub fn create_sprite(&mut self, texture: Arc<Texture>) -> DrawableId {
        let size = texture.size();
        let mut d = Drawable::new(Content::Sprite(Sprite::new(texture)));
        d.size = ScalableVector2::px(size.width, size.height);
        self.insert(d)
    }

    /// Create a detached text drawable.
    pub fn create_text(&mut self, content: impl Into<String>, font_size: f64) -> DrawableId {
        self.insert(Drawable::new(Content::Text(Text {
            content: content.into(),
            font_size,
        })))
    }

    /// Create a detached drawable from a prepared [`Drawable`] value.
    pub(crate) fn insert(&mut self, drawable: Drawable) -> DrawableId {
        let node = Node {
            drawable,
            parent: None,
            children: Vec::new(),
            dirty: Cell::new(true),
            absolute: Cell::new(Rect::ZERO),
        };
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return DrawableId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        DrawableId {
            index,
            generation: 0,
        }
    }

    // ----- hierarchy --------------------------------------------------------------------------

    /// Attach `child` under `parent` (appended last), or detach it with `None`.
    ///
    /// Fails when either handle is stale, when `child` is the root, or when `parent` lies in the
    /// subtree of `child`.
    pub fn set_parent(&mut self, child: DrawableId, parent: Option<DrawableId>) -> WobbleResult<()> {
        let old = self.require(child)?.parent;
        if child == self.root {
            return Err(WobbleError::invalid_argument("the root cannot be re-parented"));
        }
        if let Some(p) = parent {
            self.require(p)?;
            if self.is_ancestor_or_self(child, p) {
                return Err(WobbleError::invalid_argument(format!(
                    "{child:?} cannot be parented under its own subtree ({p:?})"
                )));
            }
        }
        if old == parent {
            return Ok(());
        }
        if let Some(node) = old.and_then(|o| self.node_mut(o)) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = parent.and_then(|p| self.node_mut(p)) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = parent;
        }
        self.invalidate(child.index);
        Ok(())
    }

    /// Link two freshly created drawables without the checks of [`Scene::set_parent`].
    pub(crate) fn attach_fresh(&mut self, parent: DrawableId, child: DrawableId) {
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        self.invalidate(child.index);
    }

    /// Append `child` under `parent`.
    pub fn add_child(&mut self, parent: DrawableId, child: DrawableId) -> WobbleResult<()> {
        self.set_parent(child, Some(parent))
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: DrawableId, node: DrawableId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.parent(id);
        }
        false
    }

    /// Destroy `id` and its whole subtree.
    ///
    /// Children go first, then the drawable detaches from its parent; owned render targets are
    /// released on the next draw. Stale handles are ignored. Destroying the root only clears its
    /// children.
    #[tracing::instrument(skip(self))]
    pub fn destroy(&mut self, id: DrawableId) {
        if !self.contains(id) {
            return;
        }
        if id == self.root {
            let children = self.children(id).to_vec();
            for c in children {
                self.destroy(c);
            }
            return;
        }

        let mut post_order = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((cur, expanded)) = stack.pop() {
            if expanded {
                post_order.push(cur);
                continue;
            }
            stack.push((cur, true));
            for &c in self.children(cur).iter().rev() {
                stack.push((c, false));
            }
        }

        if let Some(node) = self.parent(id).and_then(|p| self.node_mut(p)) {
            node.children.retain(|c| *c != id);
        }

        for cur in post_order {
            let slot = &mut self.slots[cur.index as usize];
            if let Some(node) = slot.node.take() {
                if let Some(rt) = node.drawable.render_target {
                    self.pending_release.push(rt);
                }
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(cur.index);
                self.live -= 1;
            }
        }
        tracing::debug!(live = self.live, "destroyed subtree");
    }

    /// Give `id` ownership of a render target, released when the drawable is destroyed.
    pub fn attach_render_target(&mut self, id: DrawableId, target: RenderTargetId) -> WobbleResult<()> {
        let previous = self.require_mut(id)?.drawable.render_target.replace(target);
        self.pending_release.extend(previous);
        Ok(())
    }

    // ----- geometry ---------------------------------------------------------------------------

    /// Set the offset from the alignment anchor.
    pub fn set_position(&mut self, id: DrawableId, position: ScalableVector2) -> WobbleResult<()> {
        self.edit_geometry(id, |d| d.position = position)
    }

    /// Set the absolute part of the x offset.
    pub fn set_x(&mut self, id: DrawableId, x: f64) -> WobbleResult<()> {
        self.edit_geometry(id, |d| d.position.x.value = x)
    }

    /// Set the absolute part of the y offset.
    pub fn set_y(&mut self, id: DrawableId, y: f64) -> WobbleResult<()> {
        self.edit_geometry(id, |d| d.position.y.value = y)
    }

    /// Set the size.
    pub fn set_size(&mut self, id: DrawableId, size: ScalableVector2) -> WobbleResult<()> {
        self.edit_geometry(id, |d| d.size = size)
    }

    /// Set the absolute part of the width.
    pub fn set_width(&mut self, id: DrawableId, width: f64) -> WobbleResult<()> {
        self.edit_geometry(id, |d| d.size.x.value = width)
    }

    /// Set the absolute part of the height.
    pub fn set_height(&mut self, id: DrawableId, height: f64) -> WobbleResult<()> {
        self.edit_geometry(id, |d| d.size.y.value = height)
    }

    /// Set the anchor on the parent rectangle.
    pub fn set_alignment(&mut self, id: DrawableId, alignment: Alignment) -> WobbleResult<()> {
        self.edit_geometry(id, |d| d.alignment = alignment)
    }

    fn edit_geometry(&mut self, id: DrawableId, f: impl FnOnce(&mut Drawable)) -> WobbleResult<()> {
        let node = self.require_mut(id)?;
        let before = (node.drawable.position, node.drawable.size, node.drawable.alignment);
        f(&mut node.drawable);
        let after = (node.drawable.position, node.drawable.size, node.drawable.alignment);
        if before != after {
            self.invalidate(id.index);
        }
        Ok(())
    }

    /// Screen-space rectangle of `id`, recomputed lazily from the nearest clean ancestor down.
    pub fn absolute_rect(&self, id: DrawableId) -> WobbleResult<Rect> {
        self.require(id)?;
        Ok(self.resolve_rect(id.index))
    }

    /// Transform from the drawable's layout space to the screen, composing every ancestor's
    /// rotation and scale around its pivot.
    pub fn render_transform(&self, id: DrawableId) -> WobbleResult<Affine> {
        self.require(id)?;
        let mut chain: SmallVec<[DrawableId; 16]> = SmallVec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            chain.push(c);
            cur = self.parent(c);
        }
        let mut transform = Affine::IDENTITY;
        for c in chain.into_iter().rev() {
            transform = transform * self.local_transform(c.index);
        }
        Ok(transform)
    }

    pub(crate) fn local_transform(&self, index: u32) -> Affine {
        match self.node_at(index) {
            Some(n) => {
                let d = &n.drawable;
                if d.rotation == 0.0 && d.scale.x == 1.0 && d.scale.y == 1.0 {
                    Affine::IDENTITY
                } else {
                    pivot_transform(self.resolve_rect(index), d.pivot, d.rotation, d.scale)
                }
            }
            None => Affine::IDENTITY,
        }
    }

    pub(crate) fn resolve_rect(&self, index: u32) -> Rect {
        let mut chain: SmallVec<[u32; 16]> = SmallVec::new();
        let mut cur = Some(index);
        while let Some(i) = cur {
            let Some(node) = self.node_at(i) else { break };
            if !node.dirty.get() {
                break;
            }
            chain.push(i);
            cur = node.parent.map(|p| p.index);
        }
        for &i in chain.iter().rev() {
            let Some(node) = self.node_at(i) else { continue };
            let parent_rect = node
                .parent
                .and_then(|p| self.node_at(p.index))
                .map_or(self.root_rect, |p| p.absolute.get());
            node.absolute.set(node.drawable.resolve_rect(parent_rect));
            node.dirty.set(false);
        }
        self.node_at(index).map_or(Rect::ZERO, |n| n.absolute.get())
    }

    fn invalidate(&self, index: u32) {
        let mut stack: SmallVec<[u32; 16]> = SmallVec::new();
        stack.push(index);
        while let Some(i) = stack.pop() {
            let Some(node) = self.node_at(i) else { continue };
            if node.dirty.replace(true) && i != index {
                continue;
            }
            stack.extend(node.children.iter().map(|c| c.index));
        }
    }

    // ----- animation --------------------------------------------------------------------------

    /// Queue an animation on `id`. Animations run in insertion order within a pass.
    pub fn add_animation(&mut self, id: DrawableId, animation: Animation) -> WobbleResult<()> {
        self.require_mut(id)?.drawable.animations.push(animation);
        Ok(())
    }

    /// Drop every pending animation of `id`; their completion callbacks never run.
    pub fn clear_animations(&mut self, id: DrawableId) -> WobbleResult<()> {
        self.require_mut(id)?.drawable.animations.clear();
        Ok(())
    }

    /// Drop pending animations of `id` that drive `property`.
    pub fn clear_animations_of(
        &mut self,
        id: DrawableId,
        property: AnimationProperty,
    ) -> WobbleResult<()> {
        self.require_mut(id)?
            .drawable
            .animations
            .retain(|a| a.property() != property);
        Ok(())
    }

    /// Pending animations of `id`.
    pub fn animations(&self, id: DrawableId) -> &[Animation] {
        self.get(id).map_or(&[], |d| d.animations())
    }

    /// Animate the absolute x offset to `x`.
    pub fn move_to_x(&mut self, id: DrawableId, x: f64, easing: Easing, ms: f64) -> WobbleResult<()> {
        let start = self.current_scalar(id, AnimationProperty::X)?;
        self.add_animation(id, Animation::scalar(AnimationProperty::X, easing, start, x, ms)?)
    }

    /// Animate the absolute y offset to `y`.
    pub fn move_to_y(&mut self, id: DrawableId, y: f64, easing: Easing, ms: f64) -> WobbleResult<()> {
        let start = self.current_scalar(id, AnimationProperty::Y)?;
        self.add_animation(id, Animation::scalar(AnimationProperty::Y, easing, start, y, ms)?)
    }

    /// Animate both offsets.
    pub fn move_to(&mut self, id: DrawableId, x: f64, y: f64, easing: Easing, ms: f64) -> WobbleResult<()> {
        self.move_to_x(id, x, easing, ms)?;
        self.move_to_y(id, y, easing, ms)
    }

    /// Animate the absolute width.
    pub fn resize_to_width(&mut self, id: DrawableId, w: f64, easing: Easing, ms: f64) -> WobbleResult<()> {
        let start = self.current_scalar(id, AnimationProperty::Width)?;
        self.add_animation(id, Animation::scalar(AnimationProperty::Width, easing, start, w, ms)?)
    }

    /// Animate the absolute height.
    pub fn resize_to_height(&mut self, id: DrawableId, h: f64, easing: Easing, ms: f64) -> WobbleResult<()> {
        let start = self.current_scalar(id, AnimationProperty::Height)?;
        self.add_animation(id, Animation::scalar(AnimationProperty::Height, easing, start, h, ms)?)
    }

    /// Animate opacity.
    pub fn fade_to(&mut self, id: DrawableId, alpha: f64, easing: Easing, ms: f64) -> WobbleResult<()> {
        let start = self.current_scalar(id, AnimationProperty::Alpha)?;
        let end = alpha.clamp(0.0, 1.0);
        self.add_animation(id, Animation::scalar(AnimationProperty::Alpha, easing, start, end, ms)?)
    }

    /// Animate rotation, in radians.
    pub fn rotate_to(&mut self, id: DrawableId, radians: f64, easing: Easing, ms: f64) -> WobbleResult<()> {
        let start = self.current_scalar(id, AnimationProperty::Rotation)?;
        self.add_animation(
            id,
            Animation::scalar(AnimationProperty::Rotation, easing, start, radians, ms)?,
        )
    }

    /// Animate the tint's RGB channels; alpha is driven by [`Scene::fade_to`].
    pub fn fade_to_color(&mut self, id: DrawableId, color: Color, easing: Easing, ms: f64) -> WobbleResult<()> {
        let start = self.require(id)?.drawable.tint;
        self.add_animation(id, Animation::color(easing, start, color, ms)?)
    }

    pub(crate) fn current_scalar(&self, id: DrawableId, property: AnimationProperty) -> WobbleResult<f64> {
        let d = &self.require(id)?.drawable;
        Ok(match property {
            AnimationProperty::X => d.position.x.value,
            AnimationProperty::Y => d.position.y.value,
            AnimationProperty::Width => d.size.x.value,
            AnimationProperty::Height => d.size.y.value,
            AnimationProperty::Alpha => d.alpha,
            AnimationProperty::Rotation => d.rotation,
            AnimationProperty::Color => {
                return Err(WobbleError::invalid_argument("colour is not a scalar property"));
            }
        })
    }

    fn apply_value(&mut self, id: DrawableId, property: AnimationProperty, value: AnimationValue) {
        let result = match (property, value) {
            (AnimationProperty::X, AnimationValue::Scalar(v)) => self.set_x(id, v),
            (AnimationProperty::Y, AnimationValue::Scalar(v)) => self.set_y(id, v),
            (AnimationProperty::Width, AnimationValue::Scalar(v)) => self.set_width(id, v.max(0.0)),
            (AnimationProperty::Height, AnimationValue::Scalar(v)) => {
                self.set_height(id, v.max(0.0))
            }
            (AnimationProperty::Alpha, AnimationValue::Scalar(v)) => {
                if let Some(d) = self.get_mut(id) {
                    d.alpha = v.clamp(0.0, 1.0);
                }
                Ok(())
            }
            (AnimationProperty::Rotation, AnimationValue::Scalar(v)) => {
                if let Some(d) = self.get_mut(id) {
                    d.rotation = v;
                }
                Ok(())
            }
            (AnimationProperty::Color, AnimationValue::Color(c)) => {
                if let Some(d) = self.get_mut(id) {
                    d.tint = Color::rgba(c.r, c.g, c.b, d.tint.a);
                }
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(e) = result {
            tracing::debug!(?id, error = %e, "animation target vanished");
        }
    }

    // ----- update -----------------------------------------------------------------------------

    /// Advance one frame.
    ///
    /// Deferred changes from the mailbox are applied first. Then every drawable in the root's
    /// subtree (hidden ones included) advances its animations in pre-order: entries completed on
    /// the previous pass are purged, the rest advance by `time.elapsed_ms`. Children are
    /// snapshotted per node, so structural edits made by mailbox entries or callbacks never
    /// disturb the walk. Completion callbacks run after the walk, in completion order.
    #[tracing::instrument(skip(self), fields(live = self.live))]
    pub fn update(&mut self, time: GameTime) {
        self.drain_mailbox();

        let dt = time.elapsed_ms;
        let mut stack: SmallVec<[DrawableId; 32]> = SmallVec::new();
        stack.push(self.root);
        while let Some(id) = stack.pop() {
            if !self.contains(id) {
                continue;
            }
            self.advance_animations(id, dt);
            let children: SmallVec<[DrawableId; 8]> =
                self.children(id).iter().rev().copied().collect();
            stack.extend(children);
        }

        let completions = std::mem::take(&mut self.completions);
        for (id, callback) in completions {
            if self.contains(id) {
                callback(self, id);
            } else {
                tracing::debug!(?id, "skipping completion for destroyed drawable");
            }
        }
    }

    fn advance_animations(&mut self, id: DrawableId, dt: f64) {
        let Some(node) = self.node_mut(id) else { return };
        node.drawable.animations.retain(|a| !a.is_done());
        if node.drawable.animations.is_empty() {
            return;
        }
        let mut animations = std::mem::take(&mut node.drawable.animations);
        for animation in &mut animations {
            let value = animation.step(dt);
            self.apply_value(id, animation.property(), value);
            if animation.is_done() {
                if let Some(callback) = animation.take_completion() {
                    self.completions.push((id, callback));
                }
            }
        }
        if let Some(node) = self.node_mut(id) {
            animations.append(&mut node.drawable.animations);
            node.drawable.animations = animations;
        }
    }

    fn drain_mailbox(&mut self) {
        let pending: Vec<Deferred> = self.mailbox_rx.try_iter().collect();
        if pending.is_empty() {
            return;
        }
        tracing::trace!(count = pending.len(), "applying deferred changes");
        for deferred in pending {
            let target = deferred.target;
            if self.contains(target) {
                (deferred.apply)(self, target);
            } else {
                tracing::debug!(?target, "dropping deferred change for destroyed drawable");
            }
        }
    }

    // ----- node access ------------------------------------------------------------------------

    pub(crate) fn node_at(&self, index: u32) -> Option<&Node> {
        self.slots.get(index as usize).and_then(|s| s.node.as_ref())
    }

    pub(crate) fn node_ref(&self, id: DrawableId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub(crate) fn node_mut(&mut self, id: DrawableId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    pub(crate) fn require(&self, id: DrawableId) -> WobbleResult<&Node> {
        self.node_ref(id)
            .ok_or_else(|| WobbleError::invalid_argument(format!("stale drawable handle {id:?}")))
    }

    pub(crate) fn require_mut(&mut self, id: DrawableId) -> WobbleResult<&mut Node> {
        self.node_mut(id)
            .ok_or_else(|| WobbleError::invalid_argument(format!("stale drawable handle {id:?}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
