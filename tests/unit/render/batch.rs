use super::*;
use crate::render::backend::{BlendState, Shader, ShaderId};
use crate::render::recording::{RecordingBackend, RenderCall};

fn prepare_and_draw(t: &mut BatchTracker, b: &mut RecordingBackend, o: &BatchOptions) -> bool {
    let begun = t.prepare(b, o).unwrap();
    t.record_primitive();
    begun
}

#[test]
fn identical_bundles_share_one_batch() {
    let mut backend = RecordingBackend::new();
    let mut t = BatchTracker::new();
    let o = BatchOptions::default();
    assert!(prepare_and_draw(&mut t, &mut backend, &o));
    assert!(!prepare_and_draw(&mut t, &mut backend, &o.clone()));
    t.finish(&mut backend).unwrap();

    assert_eq!(
        t.stats(),
        BatchStats {
            batches: 1,
            restarts: 0,
            primitives: 2
        }
    );
    assert_eq!(
        backend.calls(),
        &[RenderCall::BeginBatch(o), RenderCall::EndBatch]
    );
}

#[test]
fn any_difference_restarts_the_batch() {
    let mut backend = RecordingBackend::new();
    let mut t = BatchTracker::new();
    let base = BatchOptions::default();
    let additive = base.clone().with_blend(BlendState::Additive);
    let shaded = base
        .clone()
        .with_shader(Some(Shader::new(ShaderId(3)).with_param("t", 0.5)));
    let shaded_other_param = base
        .clone()
        .with_shader(Some(Shader::new(ShaderId(3)).with_param("t", 0.75)));

    for o in [&base, &additive, &additive, &shaded, &shaded_other_param, &base] {
        prepare_and_draw(&mut t, &mut backend, o);
    }
    t.finish(&mut backend).unwrap();
    assert_eq!(t.stats().batches, 5);
    assert_eq!(t.stats().restarts, 4);
    assert_eq!(backend.batch_count(), 5);
}

#[test]
fn finishing_without_a_batch_is_a_noop() {
    let mut backend = RecordingBackend::new();
    let mut t = BatchTracker::new();
    t.finish(&mut backend).unwrap();
    t.finish(&mut backend).unwrap();
    assert!(backend.calls().is_empty());
    assert!(backend.end_batch().is_ok());
}

#[test]
fn effective_bundle_resolution() {
    let mut backend = RecordingBackend::new();
    let mut t = BatchTracker::new();
    let default = BatchOptions::default();
    let own = default.clone().with_blend(BlendState::Opaque);
    let clip = Rect::new(0.0, 0.0, 10.0, 10.0);

    let none = BatchRequest {
        own: None,
        use_previous: true,
        clip: None,
    };
    // Nothing active yet: falls back to the default bundle.
    assert_eq!(t.effective(none, &default), default);

    t.prepare(&mut backend, &own).unwrap();
    assert_eq!(t.effective(none, &default), own);
    let fresh = BatchRequest {
        use_previous: false,
        ..none
    };
    assert_eq!(t.effective(fresh, &default), default);

    let clipped = t.effective(
        BatchRequest {
            own: Some(&own),
            use_previous: false,
            clip: Some(clip),
        },
        &default,
    );
    assert_eq!(clipped.rasterizer.scissor, Some(clip));
    assert_eq!(clipped.blend, BlendState::Opaque);
}

#[test]
fn inherited_bundle_does_not_inherit_the_neighbours_scissor() {
    let mut backend = RecordingBackend::new();
    let mut t = BatchTracker::new();
    let default = BatchOptions::default();
    let clipped = default.clone().clipped_to(Rect::new(0.0, 0.0, 5.0, 5.0));
    t.prepare(&mut backend, &clipped).unwrap();
    let inherited = t.effective(
        BatchRequest {
            own: None,
            use_previous: true,
            clip: None,
        },
        &default,
    );
    assert_eq!(inherited.rasterizer.scissor, None);
}
