use std::collections::BTreeMap;
use std::sync::Arc;

use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{WobbleError, WobbleResult};

/// Backend identifier of an uploaded texture.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TextureId(pub u32);

/// A texture shared by any number of sprites.
///
/// Sprites hold an `Arc<Texture>`; the scene never owns shared textures exclusively.
#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    /// Backend identifier.
    pub id: TextureId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Texture {
    /// Pixel size.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Full source rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.size())
    }
}

/// Name-keyed cache of shared textures.
///
/// Loading pixel data is the host's job; the store hands out reference-counted handles and
/// reports which textures nobody uses anymore so the host can release them on the backend.
#[derive(Debug, Default)]
pub struct TextureStore {
    by_name: BTreeMap<String, Arc<Texture>>,
    next_id: u32,
}

impl TextureStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture under `name` and return its shared handle.
    pub fn insert(&mut self, name: &str, width: u32, height: u32) -> WobbleResult<Arc<Texture>> {
        if name.is_empty() {
            return Err(WobbleError::invalid_argument("texture name must be non-empty"));
        }
        if width == 0 || height == 0 {
            return Err(WobbleError::invalid_argument(format!(
                "texture '{name}' must have non-zero dimensions"
            )));
        }
        if self.by_name.contains_key(name) {
            return Err(WobbleError::invalid_argument(format!(
                "texture '{name}' is already loaded"
            )));
        }
        let tex = Arc::new(Texture {
            id: TextureId(self.next_id),
            width,
            height,
        });
        self.next_id += 1;
        self.by_name.insert(name.to_string(), Arc::clone(&tex));
        Ok(tex)
    }

    /// Shared handle for `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Texture>> {
        self.by_name.get(name).cloned()
    }

    /// Number of cached textures.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Drop textures only the store still references and return their ids.
    pub fn purge_unused(&mut self) -> Vec<TextureId> {
        let mut released = Vec::new();
        self.by_name.retain(|name, tex| {
            let keep = Arc::strong_count(tex) > 1;
            if !keep {
                tracing::debug!(texture = %name, id = tex.id.0, "purging unused texture");
                released.push(tex.id);
            }
            keep
        });
        released
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
