use super::*;
use crate::animation::ease::Easing;
use crate::app::screen::Screen;
use crate::assets::store::TextureId;
use crate::foundation::error::WobbleError;
use crate::render::backend::{BatchOptions, QuadDraw, TextDraw};
use crate::render::recording::{RecordingBackend, RenderCall};
use crate::ui::input::{PointerButton, PointerState};

struct Spinner;

impl Screen for Spinner {
    fn on_enter(&mut self, ctx: &mut ScreenContext<'_>) -> WobbleResult<()> {
        let tex = ctx.textures.insert("wheel", 20, 20)?;
        let id = ctx.scene.create_button(tex);
        let root = ctx.scene.root();
        ctx.scene.add_child(root, id)?;
        ctx.scene.rotate_to(id, 1.0, Easing::Linear, 100.0)
    }

    fn update(&mut self, _ctx: &mut ScreenContext<'_>, _time: GameTime) -> WobbleResult<()> {
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut ScreenContext<'_>) -> WobbleResult<()> {
        let root = ctx.scene.root();
        ctx.scene.destroy(root);
        Ok(())
    }
}

fn context() -> AppContext {
    let mut registry = ScreenRegistry::new();
    registry.register("spin", || Box::new(Spinner)).unwrap();
    registry.register("blank", || Box::new(Blank)).unwrap();
    AppContext::with_screens(AppConfig::default(), registry).unwrap()
}

struct Blank;

impl Screen for Blank {
    fn on_enter(&mut self, _ctx: &mut ScreenContext<'_>) -> WobbleResult<()> {
        Ok(())
    }

    fn update(&mut self, _ctx: &mut ScreenContext<'_>, _time: GameTime) -> WobbleResult<()> {
        Ok(())
    }
}

#[test]
fn frames_advance_time_update_and_draw() {
    let mut ctx = context();
    ctx.change_screen("spin").unwrap();
    let mut backend = RecordingBackend::new();

    let stats = ctx.frame(50.0, &mut backend).unwrap();
    assert_eq!(stats.primitives, 1);
    assert_eq!(ctx.time(), GameTime::new(50.0, 50.0));
    let quad = backend.quads().next().unwrap();
    assert!((quad.rotation - 0.5).abs() < 1e-9);

    ctx.frame(50.0, &mut backend).unwrap();
    assert_eq!(ctx.time().total_ms, 100.0);
}

#[test]
fn input_routes_to_scene_buttons() {
    let mut ctx = context();
    ctx.change_screen("spin").unwrap();
    let p = PointerState::at(5.0, 5.0);
    assert_eq!(ctx.process_input(&p).unwrap().len(), 1);
    let events = ctx
        .process_input(&p.with_button(PointerButton::Left))
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[test]
fn unused_textures_are_released_after_their_screen_exits() {
    let mut ctx = context();
    ctx.change_screen("spin").unwrap();
    let mut backend = RecordingBackend::new();
    assert_eq!(ctx.release_unused_textures(&mut backend).unwrap(), 0);

    ctx.change_screen("blank").unwrap();
    assert_eq!(ctx.release_unused_textures(&mut backend).unwrap(), 1);
    assert!(matches!(
        backend.calls(),
        [RenderCall::ReleaseTexture(_)]
    ));
    assert!(ctx.textures.is_empty());
}

#[test]
fn invalid_configs_are_rejected() {
    let cfg = AppConfig {
        virtual_width: f64::NAN,
        ..AppConfig::default()
    };
    assert!(AppContext::new(cfg).is_err());
    assert!(context().change_screen("nope").is_err());
}

/// Recorder whose first `failures` texture releases are refused.
#[derive(Default)]
struct RefusingReleases {
    inner: RecordingBackend,
    failures: u32,
}

impl RenderBackend for RefusingReleases {
    fn begin_batch(&mut self, options: &BatchOptions) -> WobbleResult<()> {
        self.inner.begin_batch(options)
    }

    fn end_batch(&mut self) -> WobbleResult<()> {
        self.inner.end_batch()
    }

    fn draw_quad(&mut self, quad: &QuadDraw) -> WobbleResult<()> {
        self.inner.draw_quad(quad)
    }

    fn draw_text(&mut self, text: &TextDraw) -> WobbleResult<()> {
        self.inner.draw_text(text)
    }

    fn release_texture(&mut self, id: TextureId) -> WobbleResult<()> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(WobbleError::render("device lost"));
        }
        self.inner.release_texture(id)
    }
}

#[test]
fn refused_texture_releases_are_retried() {
    let mut ctx = context();
    let a = ctx.textures.insert("a", 4, 4).unwrap().id;
    let b = ctx.textures.insert("b", 4, 4).unwrap().id;
    let mut backend = RefusingReleases {
        failures: 1,
        ..RefusingReleases::default()
    };

    assert!(ctx.release_unused_textures(&mut backend).is_err());
    assert!(ctx.textures.is_empty());
    assert_eq!(backend.inner.calls(), &[RenderCall::ReleaseTexture(b)]);

    assert_eq!(ctx.release_unused_textures(&mut backend).unwrap(), 1);
    assert_eq!(
        backend.inner.calls(),
        &[RenderCall::ReleaseTexture(b), RenderCall::ReleaseTexture(a)]
    );
    assert_eq!(ctx.release_unused_textures(&mut backend).unwrap(), 0);
}
