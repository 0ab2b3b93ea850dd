use std::sync::Arc;

use crate::assets::store::Texture;
use crate::foundation::error::{WobbleError, WobbleResult};
use crate::layer::manager::LayerManager;
use crate::scene::tree::{DrawableId, Scene};
use crate::ui::input::{InputSource, PointerButton};

/// Clickable behaviour attached to a drawable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Clickable {
    pub(crate) enabled: bool,
}

/// Pointer state carried between frames.
#[derive(Debug, Default)]
pub(crate) struct ButtonTracker {
    hovered: Option<DrawableId>,
    pressed: Option<DrawableId>,
    was_down: bool,
}

/// What happened to a button this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonEvent {
    /// The pointer moved onto the button.
    HoverEnter(DrawableId),
    /// The pointer left the button.
    HoverLeave(DrawableId),
    /// The primary button went down over the button.
    Pressed(DrawableId),
    /// Press and release both landed on the button.
    Clicked(DrawableId),
}

impl ButtonEvent {
    /// Button the event concerns.
    pub fn target(self) -> DrawableId {
        match self {
            Self::HoverEnter(id) | Self::HoverLeave(id) | Self::Pressed(id) | Self::Clicked(id) => id,
        }
    }
}

impl Scene {
    /// Create a detached sprite that reacts to the pointer.
    pub fn create_button(&mut self, texture: Arc<Texture>) -> DrawableId {
        let id = self.create_sprite(texture);
        if let Some(node) = self.node_mut(id) {
            node.drawable.clickable = Some(Clickable { enabled: true });
        }
        id
    }

    /// Make any drawable clickable.
    pub fn make_clickable(&mut self, id: DrawableId) -> WobbleResult<()> {
        self.require_mut(id)?.drawable.clickable = Some(Clickable { enabled: true });
        Ok(())
    }

    /// Enable or disable a clickable drawable; disabled buttons are transparent to the pointer.
    pub fn set_button_enabled(&mut self, id: DrawableId, enabled: bool) -> WobbleResult<()> {
        match self.require_mut(id)?.drawable.clickable.as_mut() {
            Some(c) => {
                c.enabled = enabled;
                Ok(())
            }
            None => Err(WobbleError::invalid_argument(format!("{id:?} is not clickable"))),
        }
    }

    /// Button under the pointer as of the last [`Scene::process_input`].
    pub fn hovered_button(&self) -> Option<DrawableId> {
        self.buttons.hovered.filter(|id| self.contains(*id))
    }

    /// Feed one frame of pointer input.
    ///
    /// Only the top-most visible, enabled clickable under the pointer is hovered, using the same
    /// order as drawing and honouring scroll viewports. A click is a press and a later release of
    /// the primary button over the same button.
    #[tracing::instrument(skip_all)]
    pub fn process_input(
        &mut self,
        input: &dyn InputSource,
        layers: &LayerManager,
    ) -> WobbleResult<Vec<ButtonEvent>> {
        let pointer = input.pointer_position();
        let down = input.is_pointer_button_down(PointerButton::Left);

        let items = self.collect_draw_items(layers)?;
        let target = items
            .iter()
            .rev()
            .filter(|item| {
                self.get(item.id)
                    .and_then(|d| d.clickable)
                    .is_some_and(|c| c.enabled)
            })
            .find(|item| {
                let local = item.transform.inverse() * pointer;
                item.rect.contains(local)
                    && item.clip.is_none_or(|clip| clip.contains(pointer))
            })
            .map(|item| item.id);

        let mut events = Vec::new();
        let previous = self.hovered_button();
        if previous != target {
            events.extend(previous.map(ButtonEvent::HoverLeave));
            events.extend(target.map(ButtonEvent::HoverEnter));
        }
        self.buttons.hovered = target;

        let tracker = &mut self.buttons;
        if down && !tracker.was_down {
            tracker.pressed = target;
            events.extend(target.map(ButtonEvent::Pressed));
        } else if !down && tracker.was_down {
            if let Some(pressed) = tracker.pressed.take() {
                if Some(pressed) == target {
                    events.push(ButtonEvent::Clicked(pressed));
                }
            }
        }
        tracker.was_down = down;

        if !events.is_empty() {
            tracing::trace!(count = events.len(), "button events");
        }
        Ok(events)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/button.rs"]
mod tests;
