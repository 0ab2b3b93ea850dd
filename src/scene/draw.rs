use std::collections::HashMap;

use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::WobbleResult;
use crate::layer::manager::{LayerId, LayerManager};
use crate::render::backend::{QuadDraw, RenderBackend, TextDraw, release_all};
use crate::render::batch::{BatchRequest, BatchStats, BatchTracker};
use crate::scene::drawable::Content;
use crate::scene::tree::{DrawableId, Scene};

/// One visible drawable, resolved for drawing.
#[derive(Clone, Debug)]
pub(crate) struct DrawItem {
    pub(crate) id: DrawableId,
    pub(crate) layer_order: u32,
    pub(crate) rect: Rect,
    pub(crate) alpha: f64,
    pub(crate) rotation: f64,
    pub(crate) transform: Affine,
    pub(crate) clip: Option<Rect>,
}

impl DrawItem {
    /// Whether the enclosing scroll viewport hides this drawable entirely.
    pub(crate) fn is_culled(&self) -> bool {
        match self.clip {
            Some(clip) => {
                let overlap = clip.intersect(self.rect);
                overlap.width() <= 0.0 || overlap.height() <= 0.0
            }
            None => false,
        }
    }
}

#[derive(Clone, Copy)]
struct Inherited {
    layer: LayerId,
    alpha: f64,
    rotation: f64,
    transform: Affine,
    clip: Option<Rect>,
}

impl Scene {
    /// Visible drawables of the root's subtree in the order they are drawn.
    ///
    /// Pre-order tree position decides order within a layer; layers are ordered by
    /// [`LayerManager::resolved_order`]. A drawable without a layer inherits its nearest layered
    /// ancestor, falling back to the default layer.
    pub fn draw_order(&self, layers: &LayerManager) -> WobbleResult<Vec<DrawableId>> {
        Ok(self
            .collect_draw_items(layers)?
            .into_iter()
            .map(|i| i.id)
            .collect())
    }

    pub(crate) fn collect_draw_items(&self, layers: &LayerManager) -> WobbleResult<Vec<DrawItem>> {
        let mut orders: HashMap<LayerId, u32> = HashMap::new();
        let mut items = Vec::with_capacity(self.len());
        let mut stack = vec![(
            self.root(),
            Inherited {
                layer: layers.default_layer(),
                alpha: 1.0,
                rotation: 0.0,
                transform: Affine::IDENTITY,
                clip: None,
            },
        )];

        while let Some((id, inherited)) = stack.pop() {
            let Some(node) = self.node_ref(id) else {
                continue;
            };
            let d = &node.drawable;
            if !d.visible {
                continue;
            }

            let layer = d.layer.unwrap_or(inherited.layer);
            let layer_order = match orders.get(&layer) {
                Some(order) => *order,
                None => {
                    let order = layers.order_of(layer)?;
                    orders.insert(layer, order);
                    order
                }
            };
            let rect = self.resolve_rect(id.index);
            let here = Inherited {
                layer,
                alpha: inherited.alpha * d.alpha.clamp(0.0, 1.0),
                rotation: inherited.rotation + d.rotation,
                transform: inherited.transform * self.local_transform(id.index),
                clip: inherited.clip,
            };
            items.push(DrawItem {
                id,
                layer_order,
                rect,
                alpha: here.alpha,
                rotation: here.rotation,
                transform: here.transform,
                clip: here.clip,
            });

            let for_children = if d.scrollable.is_some() {
                Inherited {
                    clip: Some(inherited.clip.map_or(rect, |c| c.intersect(rect))),
                    ..here
                }
            } else {
                here
            };
            for &child in node.children.iter().rev() {
                stack.push((child, for_children));
            }
        }

        items.sort_by_key(|i| i.layer_order);
        Ok(items)
    }

    /// Draw the root's subtree through `backend`.
    ///
    /// Render targets released by destroyed drawables are handed back first; ones the backend
    /// refuses stay queued for the next frame. Batches open lazily and restart only when the next
    /// primitive needs a different bundle. An open batch is always ended, even when a draw call
    /// fails. The returned counters describe this frame alone.
    #[tracing::instrument(skip_all, fields(live = self.len()))]
    pub fn draw(
        &mut self,
        backend: &mut dyn RenderBackend,
        layers: &LayerManager,
    ) -> WobbleResult<BatchStats> {
        let pending = std::mem::take(&mut self.pending_release);
        release_all(pending, &mut self.pending_release, |target| {
            backend.release_render_target(target)
        })?;

        let items = self.collect_draw_items(layers)?;
        let mut tracker = BatchTracker::new();
        let submitted = self.submit(&items, backend, &mut tracker);
        let finished = tracker.finish(backend);
        submitted?;
        finished?;

        let stats = tracker.stats();
        tracing::debug!(
            batches = stats.batches,
            restarts = stats.restarts,
            primitives = stats.primitives,
            "frame drawn"
        );
        Ok(stats)
    }

    fn submit(
        &self,
        items: &[DrawItem],
        backend: &mut dyn RenderBackend,
        tracker: &mut BatchTracker,
    ) -> WobbleResult<()> {
        for item in items {
            let Some(node) = self.node_ref(item.id) else {
                continue;
            };
            let d = &node.drawable;
            if matches!(d.content, Content::None) {
                continue;
            }
            if item.is_culled() {
                tracing::trace!(id = ?item.id, "culled by scroll viewport");
                continue;
            }

            let options = tracker.effective(
                BatchRequest {
                    own: d.batch_options.as_ref(),
                    use_previous: d.use_previous_batch_options,
                    clip: item.clip,
                },
                &self.default_batch,
            );
            tracker.prepare(backend, &options)?;

            let tint = d.tint.fade(item.alpha);
            match &d.content {
                Content::Sprite(sprite) => {
                    let origin = Point::new(
                        item.rect.x0 + item.rect.width() * d.pivot.x,
                        item.rect.y0 + item.rect.height() * d.pivot.y,
                    );
                    backend.draw_quad(&QuadDraw {
                        texture: sprite.texture.id,
                        dest: item.rect,
                        source: sprite.source.unwrap_or_else(|| sprite.texture.bounds()),
                        tint,
                        rotation: item.rotation,
                        origin,
                        effects: sprite.effects,
                        layer_depth: sprite.layer_depth,
                        transform: item.transform,
                    })?;
                }
                Content::Text(text) => {
                    backend.draw_text(&TextDraw {
                        text: text.content.clone(),
                        font_size: text.font_size,
                        dest: item.rect,
                        tint,
                        transform: item.transform,
                    })?;
                }
                Content::None => continue,
            }
            tracker.record_primitive();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/draw.rs"]
mod tests;
