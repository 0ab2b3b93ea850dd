use super::*;
use crate::foundation::core::Rect;
use crate::foundation::time::GameTime;

fn scene_with_child() -> (Scene, DrawableId) {
    let mut s = Scene::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    let id = s.create_container();
    let root = s.root();
    s.add_child(root, id).unwrap();
    (s, id)
}

#[test]
fn posts_from_other_threads_apply_on_next_update_in_order() {
    let (mut s, id) = scene_with_child();
    let mailbox = s.mailbox();
    std::thread::spawn(move || {
        assert!(mailbox.post(id, |scene, id| scene.set_x(id, 5.0).unwrap()));
        assert!(mailbox.post(id, |scene, id| scene.set_x(id, 9.0).unwrap()));
    })
    .join()
    .unwrap();

    assert_eq!(s.get(id).unwrap().position().x.value, 0.0);
    s.update(GameTime::new(16.0, 16.0));
    assert_eq!(s.get(id).unwrap().position().x.value, 9.0);
}

#[test]
fn deferred_changes_run_before_animations() {
    let (mut s, id) = scene_with_child();
    s.mailbox().post(id, |scene, id| {
        scene
            .move_to_x(id, 100.0, crate::animation::ease::Easing::Linear, 100.0)
            .unwrap();
    });
    s.update(GameTime::new(50.0, 50.0));
    assert_eq!(s.get(id).unwrap().position().x.value, 50.0);
}

#[test]
fn posts_for_destroyed_targets_are_dropped() {
    let (mut s, id) = scene_with_child();
    let mailbox = s.mailbox();
    mailbox.post(id, |scene, id| scene.get_mut(id).unwrap().alpha = 0.0);
    s.destroy(id);
    let reused = s.create_container();
    assert_eq!(reused.index(), id.index());
    s.update(GameTime::new(16.0, 16.0));
    assert_eq!(s.get(reused).unwrap().alpha, 1.0);
}

#[test]
fn posting_after_the_scene_is_gone_reports_false() {
    let (s, id) = scene_with_child();
    let mailbox = s.mailbox();
    drop(s);
    assert!(!mailbox.post(id, |_, _| {}));
}
