use crate::app::config::AppConfig;
use crate::app::screen::{ScreenContext, ScreenManager, ScreenRegistry};
use crate::assets::store::{TextureId, TextureStore};
use crate::foundation::error::WobbleResult;
use crate::foundation::time::GameTime;
use crate::layer::manager::LayerManager;
use crate::render::backend::{RenderBackend, release_all};
use crate::render::batch::BatchStats;
use crate::scene::tree::Scene;
use crate::ui::button::ButtonEvent;
use crate::ui::input::InputSource;

/// Everything one running application owns, created at startup and dropped at shutdown.
#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub scene: Scene,
    pub layers: LayerManager,
    pub textures: TextureStore,
    pub screens: ScreenManager,
    time: GameTime,
    unreleased_textures: Vec<TextureId>,
}

impl AppContext {
    /// Context with an empty scene sized to the configured virtual screen.
    pub fn new(config: AppConfig) -> WobbleResult<Self> {
        Self::with_screens(config, ScreenRegistry::new())
    }

    /// Context whose screen manager uses `registry`.
    pub fn with_screens(config: AppConfig, registry: ScreenRegistry) -> WobbleResult<Self> {
        config.validate()?;
        let mut scene = Scene::new(config.root_rect());
        scene.set_default_batch(config.default_batch.clone());
        Ok(Self {
            config,
            scene,
            layers: LayerManager::new(),
            textures: TextureStore::new(),
            screens: ScreenManager::new(registry),
            time: GameTime::default(),
            unreleased_textures: Vec::new(),
        })
    }

    /// Time of the last update.
    pub fn time(&self) -> GameTime {
        self.time
    }

    /// Switch to the screen registered under `key`.
    pub fn change_screen(&mut self, key: &str) -> WobbleResult<()> {
        let Self {
            config,
            scene,
            layers,
            textures,
            screens,
            ..
        } = self;
        let mut ctx = ScreenContext::new(scene, layers, textures, config);
        screens.change(key, &mut ctx)
    }

    /// Advance time by `dt_ms`, update the current screen, then the scene.
    pub fn update(&mut self, dt_ms: f64) -> WobbleResult<GameTime> {
        self.time = self.time.advance(dt_ms);
        let time = self.time;
        let Self {
            config,
            scene,
            layers,
            textures,
            screens,
            ..
        } = self;
        let mut ctx = ScreenContext::new(scene, layers, textures, config);
        screens.update(&mut ctx, time)?;
        self.scene.update(time);
        Ok(time)
    }

    /// Draw the scene.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend) -> WobbleResult<BatchStats> {
        self.scene.draw(backend, &self.layers)
    }

    /// One full frame: update then draw.
    pub fn frame(&mut self, dt_ms: f64, backend: &mut dyn RenderBackend) -> WobbleResult<BatchStats> {
        self.update(dt_ms)?;
        self.draw(backend)
    }

    /// Route pointer input to the scene's buttons.
    pub fn process_input(&mut self, input: &dyn InputSource) -> WobbleResult<Vec<ButtonEvent>> {
        self.scene.process_input(input, &self.layers)
    }

    /// Drop textures no drawable references anymore and release them on the backend.
    ///
    /// Textures the backend fails to release are retried on the next call. Returns how many were
    /// released this time.
    pub fn release_unused_textures(&mut self, backend: &mut dyn RenderBackend) -> WobbleResult<usize> {
        let mut ids = std::mem::take(&mut self.unreleased_textures);
        ids.extend(self.textures.purge_unused());
        release_all(ids, &mut self.unreleased_textures, |id| {
            backend.release_texture(id)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/context.rs"]
mod tests;
