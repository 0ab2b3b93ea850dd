use super::*;
use crate::assets::store::TextureStore;
use crate::foundation::core::Color;
use crate::graphics::geometry::ScalableVector2;
use crate::foundation::error::{WobbleError, WobbleResult};
use crate::render::backend::{BatchOptions, BlendState, RenderTargetId};
use crate::render::recording::{RecordingBackend, RenderCall};

struct Fixture {
    scene: Scene,
    layers: LayerManager,
    textures: TextureStore,
}

impl Fixture {
    fn new() -> Self {
        let mut textures = TextureStore::new();
        textures.insert("tile", 32, 16).unwrap();
        Self {
            scene: Scene::new(Rect::new(0.0, 0.0, 800.0, 600.0)),
            layers: LayerManager::new(),
            textures,
        }
    }

    fn sprite(&mut self, parent: DrawableId) -> DrawableId {
        let tex = self.textures.get("tile").unwrap();
        let id = self.scene.create_sprite(tex);
        self.scene.add_child(parent, id).unwrap();
        id
    }

    fn group(&mut self, parent: DrawableId) -> DrawableId {
        let id = self.scene.create_container();
        self.scene
            .set_size(id, ScalableVector2::relative(1.0, 1.0))
            .unwrap();
        self.scene.add_child(parent, id).unwrap();
        id
    }

    fn draw_with(&mut self, backend: &mut Flaky) -> WobbleResult<BatchStats> {
        self.scene.draw(backend, &self.layers)
    }

    fn draw(&mut self) -> (BatchStats, RecordingBackend) {
        let mut backend = RecordingBackend::new();
        let stats = self.scene.draw(&mut backend, &self.layers).unwrap();
        (stats, backend)
    }
}

/// Recorder that refuses the next few quads or render target releases.
#[derive(Default)]
struct Flaky {
    inner: RecordingBackend,
    failing_quads: u32,
    failing_releases: u32,
}

fn refuse(budget: &mut u32) -> WobbleResult<()> {
    if *budget > 0 {
        *budget -= 1;
        return Err(WobbleError::render("device lost"));
    }
    Ok(())
}

impl RenderBackend for Flaky {
    fn begin_batch(&mut self, options: &BatchOptions) -> WobbleResult<()> {
        self.inner.begin_batch(options)
    }

    fn end_batch(&mut self) -> WobbleResult<()> {
        self.inner.end_batch()
    }

    fn draw_quad(&mut self, quad: &QuadDraw) -> WobbleResult<()> {
        refuse(&mut self.failing_quads)?;
        self.inner.draw_quad(quad)
    }

    fn draw_text(&mut self, text: &TextDraw) -> WobbleResult<()> {
        self.inner.draw_text(text)
    }

    fn release_render_target(&mut self, id: RenderTargetId) -> WobbleResult<()> {
        refuse(&mut self.failing_releases)?;
        self.inner.release_render_target(id)
    }
}

#[test]
fn empty_scene_draws_nothing() {
    let mut f = Fixture::new();
    let (stats, backend) = f.draw();
    assert_eq!(stats, BatchStats::default());
    assert!(backend.calls().is_empty());
}

#[test]
fn children_draw_in_insertion_order_and_hidden_subtrees_are_skipped() {
    let mut f = Fixture::new();
    let root = f.scene.root();
    let a = f.sprite(root);
    let hidden = f.group(root);
    let under_hidden = f.sprite(hidden);
    let b = f.sprite(root);
    f.scene.get_mut(hidden).unwrap().visible = false;

    let order = f.scene.draw_order(&f.layers).unwrap();
    assert_eq!(order, vec![root, a, b]);
    assert!(!order.contains(&under_hidden));

    let (stats, backend) = f.draw();
    assert_eq!(stats.primitives, 2);
    assert_eq!(backend.quads().count(), 2);
}

#[test]
fn layers_reorder_drawing_and_inherit_down_the_tree() {
    let mut f = Fixture::new();
    let world = f.layers.new_layer("world").unwrap();
    let ui = f.layers.new_layer("ui").unwrap();
    f.layers.require_above(ui, world).unwrap();

    let root = f.scene.root();
    let hud = f.group(root);
    f.scene.get_mut(hud).unwrap().layer = Some(ui);
    let hud_icon = f.sprite(hud);
    let ground = f.sprite(root);
    f.scene.get_mut(ground).unwrap().layer = Some(world);
    let plain = f.sprite(root);

    let order = f.scene.draw_order(&f.layers).unwrap();
    assert_eq!(order, vec![root, plain, ground, hud, hud_icon]);
}

#[test]
fn same_layer_keeps_tree_order() {
    let mut f = Fixture::new();
    let l = f.layers.new_layer("l").unwrap();
    let root = f.scene.root();
    let ids: Vec<_> = (0..5).map(|_| f.sprite(root)).collect();
    for &id in ids.iter().step_by(2) {
        f.scene.get_mut(id).unwrap().layer = Some(l);
    }
    let order = f.scene.draw_order(&f.layers).unwrap();
    assert_eq!(order, vec![root, ids[1], ids[3], ids[0], ids[2], ids[4]]);
}

#[test]
fn foreign_layer_ids_are_rejected() {
    let mut f = Fixture::new();
    let root = f.scene.root();
    let a = f.sprite(root);
    f.scene.get_mut(a).unwrap().layer = Some(LayerId(42));
    let mut backend = RecordingBackend::new();
    assert!(f.scene.draw(&mut backend, &f.layers).is_err());
}

#[test]
fn batches_restart_only_on_state_change() {
    let mut f = Fixture::new();
    let root = f.scene.root();
    let a = f.sprite(root);
    let b = f.sprite(root);
    let c = f.sprite(root);
    let d = f.sprite(root);
    let additive = BatchOptions::default().with_blend(BlendState::Additive);
    f.scene.get_mut(b).unwrap().batch_options = Some(additive.clone());
    f.scene.get_mut(c).unwrap().use_previous_batch_options = true;
    let _ = (a, d);

    let (stats, backend) = f.draw();
    assert_eq!(
        stats,
        BatchStats {
            batches: 3,
            restarts: 2,
            primitives: 4
        }
    );
    let begun: Vec<_> = backend
        .calls()
        .iter()
        .filter_map(|c| match c {
            RenderCall::BeginBatch(o) => Some(o.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        begun,
        vec![BatchOptions::default(), additive, BatchOptions::default()]
    );
    assert_eq!(backend.calls().last(), Some(&RenderCall::EndBatch));
}

#[test]
fn containers_never_open_batches() {
    let mut f = Fixture::new();
    let root = f.scene.root();
    let g = f.group(root);
    f.group(g);
    let (stats, backend) = f.draw();
    assert_eq!(stats.batches, 0);
    assert!(backend.calls().is_empty());
}

#[test]
fn alpha_multiplies_down_the_tree() {
    let mut f = Fixture::new();
    let root = f.scene.root();
    let g = f.group(root);
    f.scene.get_mut(g).unwrap().alpha = 0.5;
    let s = f.sprite(g);
    f.scene.get_mut(s).unwrap().tint = Color::rgba(10, 20, 30, 200);

    let (_, backend) = f.draw();
    let quad = backend.quads().next().unwrap();
    assert_eq!(quad.tint, Color::rgba(10, 20, 30, 100));
    assert_eq!(quad.dest, Rect::new(0.0, 0.0, 32.0, 16.0));
    assert_eq!(quad.source, Rect::new(0.0, 0.0, 32.0, 16.0));
    assert_eq!(quad.origin, Point::new(16.0, 8.0));
}

#[test]
fn text_goes_through_draw_text() {
    let mut f = Fixture::new();
    let root = f.scene.root();
    let t = f.scene.create_text("score: 10", 18.0);
    f.scene.add_child(root, t).unwrap();
    let (stats, backend) = f.draw();
    assert_eq!(stats.primitives, 1);
    assert!(matches!(
        &backend.calls()[1],
        RenderCall::Text(td) if td.text == "score: 10" && td.font_size == 18.0
    ));
}

#[test]
fn released_render_targets_are_handed_back_before_drawing() {
    let mut f = Fixture::new();
    let root = f.scene.root();
    let a = f.sprite(root);
    let b = f.sprite(root);
    f.scene.attach_render_target(a, RenderTargetId(3)).unwrap();
    f.scene.destroy(a);

    let (_, backend) = f.draw();
    assert_eq!(
        backend.calls()[0],
        RenderCall::ReleaseRenderTarget(RenderTargetId(3))
    );
    assert_eq!(backend.quads().count(), 1);
    assert!(f.scene.contains(b));

    let (_, again) = f.draw();
    assert!(
        !again
            .calls()
            .iter()
            .any(|c| matches!(c, RenderCall::ReleaseRenderTarget(_)))
    );
}

#[test]
fn failed_draw_call_still_ends_the_batch() {
    let mut f = Fixture::new();
    let root = f.scene.root();
    f.sprite(root);
    f.sprite(root);
    let mut backend = Flaky {
        failing_quads: 1,
        ..Flaky::default()
    };

    assert!(f.draw_with(&mut backend).is_err());
    assert_eq!(backend.inner.calls().last(), Some(&RenderCall::EndBatch));

    let stats = f.draw_with(&mut backend).unwrap();
    assert_eq!(stats.primitives, 2);
    assert_eq!(backend.inner.quads().count(), 2);
    assert_eq!(backend.inner.calls().last(), Some(&RenderCall::EndBatch));
}

#[test]
fn refused_render_target_releases_are_retried_next_frame() {
    let mut f = Fixture::new();
    let root = f.scene.root();
    let a = f.sprite(root);
    let b = f.sprite(root);
    f.scene.attach_render_target(a, RenderTargetId(1)).unwrap();
    f.scene.attach_render_target(b, RenderTargetId(2)).unwrap();
    f.scene.destroy(a);
    f.scene.destroy(b);
    let mut backend = Flaky {
        failing_releases: 1,
        ..Flaky::default()
    };

    assert!(f.draw_with(&mut backend).is_err());
    assert_eq!(
        backend.inner.calls(),
        &[RenderCall::ReleaseRenderTarget(RenderTargetId(2))]
    );

    f.draw_with(&mut backend).unwrap();
    assert_eq!(
        backend.inner.calls(),
        &[
            RenderCall::ReleaseRenderTarget(RenderTargetId(2)),
            RenderCall::ReleaseRenderTarget(RenderTargetId(1)),
        ]
    );

    f.draw_with(&mut backend).unwrap();
    assert_eq!(backend.inner.calls().len(), 2);
}
