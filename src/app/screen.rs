use std::collections::BTreeMap;
use std::fmt;

use crate::app::config::AppConfig;
use crate::assets::store::TextureStore;
use crate::foundation::error::{WobbleError, WobbleResult};
use crate::foundation::time::GameTime;
use crate::layer::manager::LayerManager;
use crate::scene::tree::Scene;

/// Borrowed view of the application handed to screens.
pub struct ScreenContext<'a> {
    pub scene: &'a mut Scene,
    pub layers: &'a mut LayerManager,
    pub textures: &'a mut TextureStore,
    pub config: &'a AppConfig,
    pub(crate) next_screen: Option<String>,
}

impl<'a> ScreenContext<'a> {
    pub(crate) fn new(
        scene: &'a mut Scene,
        layers: &'a mut LayerManager,
        textures: &'a mut TextureStore,
        config: &'a AppConfig,
    ) -> Self {
        Self {
            scene,
            layers,
            textures,
            config,
            next_screen: None,
        }
    }

    /// Switch to the screen registered under `key` once the current update returns.
    pub fn change_screen(&mut self, key: impl Into<String>) {
        self.next_screen = Some(key.into());
    }
}

/// One state of the application (menu, gameplay, results, ...).
pub trait Screen {
    /// Called when the screen becomes current; typically builds its drawables.
    fn on_enter(&mut self, ctx: &mut ScreenContext<'_>) -> WobbleResult<()>;

    /// Called once per frame before the scene updates.
    fn update(&mut self, ctx: &mut ScreenContext<'_>, time: GameTime) -> WobbleResult<()>;

    /// Called when another screen replaces this one.
    fn on_exit(&mut self, _ctx: &mut ScreenContext<'_>) -> WobbleResult<()> {
        Ok(())
    }
}

type ScreenFactory = Box<dyn Fn() -> Box<dyn Screen>>;

/// String keys mapped to screen factories.
#[derive(Default)]
pub struct ScreenRegistry {
    factories: BTreeMap<String, ScreenFactory>,
}

impl fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `key`; keys are unique.
    pub fn register(
        &mut self,
        key: &str,
        factory: impl Fn() -> Box<dyn Screen> + 'static,
    ) -> WobbleResult<()> {
        if self.factories.contains_key(key) {
            return Err(WobbleError::invalid_argument(format!(
                "screen '{key}' is already registered"
            )));
        }
        self.factories.insert(key.to_owned(), Box::new(factory));
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    fn build(&self, key: &str) -> WobbleResult<Box<dyn Screen>> {
        self.factories
            .get(key)
            .map(|f| f())
            .ok_or_else(|| WobbleError::invalid_argument(format!("unknown screen '{key}'")))
    }
}

/// Holds the current screen and swaps it on request.
#[derive(Default)]
pub struct ScreenManager {
    registry: ScreenRegistry,
    current: Option<(String, Box<dyn Screen>)>,
}

impl fmt::Debug for ScreenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenManager")
            .field("registry", &self.registry)
            .field("current", &self.current_key())
            .finish()
    }
}

impl ScreenManager {
    pub fn new(registry: ScreenRegistry) -> Self {
        Self {
            registry,
            current: None,
        }
    }

    pub fn registry(&self) -> &ScreenRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ScreenRegistry {
        &mut self.registry
    }

    /// Key of the current screen.
    pub fn current_key(&self) -> Option<&str> {
        self.current.as_ref().map(|(k, _)| k.as_str())
    }

    /// Replace the current screen with a fresh instance of `key`.
    ///
    /// The new screen is built before the old one exits, so an unknown key leaves the current
    /// screen in place.
    pub fn change(&mut self, key: &str, ctx: &mut ScreenContext<'_>) -> WobbleResult<()> {
        let mut next = self.registry.build(key)?;
        if let Some((old_key, mut old)) = self.current.take() {
            tracing::debug!(from = %old_key, to = %key, "changing screen");
            old.on_exit(ctx)?;
        }
        next.on_enter(ctx)?;
        self.current = Some((key.to_owned(), next));
        Ok(())
    }

    /// Update the current screen, then honour a change it requested.
    pub fn update(&mut self, ctx: &mut ScreenContext<'_>, time: GameTime) -> WobbleResult<()> {
        if let Some((_, screen)) = self.current.as_mut() {
            screen.update(ctx, time)?;
        }
        if let Some(key) = ctx.next_screen.take() {
            self.change(&key, ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/screen.rs"]
mod tests;
