use crate::animation::ease::Easing;
use crate::animation::transform::AnimationProperty;
use crate::foundation::error::{WobbleError, WobbleResult};
use crate::graphics::geometry::{ScalableVector1, ScalableVector2};
use crate::scene::drawable::{Content, Drawable};
use crate::scene::tree::{DrawableId, Scene};

/// Scroll behaviour: a viewport clipping a taller content container.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scrollable {
    pub(crate) content: DrawableId,
    pub(crate) target: f64,
}

impl Scene {
    /// Create a detached scroll container of size `viewport` whose content is `content_height`
    /// pixels tall and as wide as the viewport.
    ///
    /// Put children under [`Scene::scroll_content`]; the viewport clips them and culls the ones
    /// scrolled entirely out of view.
    pub fn create_scroll_container(
        &mut self,
        viewport: ScalableVector2,
        content_height: f64,
    ) -> DrawableId {
        let mut frame = Drawable::new(Content::None);
        frame.size = viewport;
        let scroll = self.insert(frame);

        let mut inner = Drawable::new(Content::None);
        inner.size = ScalableVector2 {
            x: ScalableVector1::relative(1.0),
            y: ScalableVector1::px(content_height.max(0.0)),
        };
        inner.name = Some("scroll-content".to_owned());
        let content = self.insert(inner);
        self.attach_fresh(scroll, content);

        if let Some(node) = self.node_mut(scroll) {
            node.drawable.scrollable = Some(Scrollable {
                content,
                target: 0.0,
            });
        }
        scroll
    }

    /// Content container of a scroll container.
    pub fn scroll_content(&self, id: DrawableId) -> Option<DrawableId> {
        self.get(id).and_then(|d| d.scrollable).map(|s| s.content)
    }

    /// Current scroll offset, positive when scrolled down.
    pub fn scroll_offset(&self, id: DrawableId) -> WobbleResult<f64> {
        let s = self.scrollable(id)?;
        Ok(self.get(s.content).map_or(0.0, |d| -d.position().y.value))
    }

    /// Largest reachable offset.
    pub fn max_scroll(&self, id: DrawableId) -> WobbleResult<f64> {
        let s = self.scrollable(id)?;
        let viewport = self.absolute_rect(id)?.height();
        let content = self.absolute_rect(s.content)?.height();
        Ok((content - viewport).max(0.0))
    }

    /// Resize the content; a pending scroll target beyond the new end is pulled back.
    pub fn set_content_height(&mut self, id: DrawableId, height: f64) -> WobbleResult<()> {
        let s = self.scrollable(id)?;
        self.set_height(s.content, height.max(0.0))?;
        if s.target > self.max_scroll(id)? {
            self.scroll_to(id, s.target, Easing::Linear, 0.0)?;
        }
        Ok(())
    }

    /// Scroll to `offset`, clamped to `[0, max_scroll]`, over `ms` milliseconds.
    ///
    /// A new request replaces any scroll still in flight. Returns the clamped target.
    pub fn scroll_to(
        &mut self,
        id: DrawableId,
        offset: f64,
        easing: Easing,
        ms: f64,
    ) -> WobbleResult<f64> {
        let s = self.scrollable(id)?;
        let target = offset.clamp(0.0, self.max_scroll(id)?);
        self.clear_animations_of(s.content, AnimationProperty::Y)?;
        if ms > 0.0 {
            self.move_to_y(s.content, -target, easing, ms)?;
        } else {
            self.set_y(s.content, -target)?;
        }
        if let Some(sc) = self.get_mut(id).and_then(|d| d.scrollable.as_mut()) {
            sc.target = target;
        }
        tracing::trace!(?id, target, "scroll");
        Ok(target)
    }

    /// Scroll relative to the current target.
    pub fn scroll_by(
        &mut self,
        id: DrawableId,
        delta: f64,
        easing: Easing,
        ms: f64,
    ) -> WobbleResult<f64> {
        let s = self.scrollable(id)?;
        self.scroll_to(id, s.target + delta, easing, ms)
    }

    fn scrollable(&self, id: DrawableId) -> WobbleResult<Scrollable> {
        self.require(id)?
            .drawable
            .scrollable
            .ok_or_else(|| WobbleError::invalid_argument(format!("{id:?} is not a scroll container")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/scroll.rs"]
mod tests;
