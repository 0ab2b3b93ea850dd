use super::*;

use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
    next: Option<&'static str>,
}

impl Screen for Recorder {
    fn on_enter(&mut self, ctx: &mut ScreenContext<'_>) -> WobbleResult<()> {
        let id = ctx.scene.create_container();
        let root = ctx.scene.root();
        ctx.scene.add_child(root, id)?;
        self.log.borrow_mut().push(format!("enter {}", self.name));
        Ok(())
    }

    fn update(&mut self, ctx: &mut ScreenContext<'_>, time: GameTime) -> WobbleResult<()> {
        self.log
            .borrow_mut()
            .push(format!("update {} {}", self.name, time.total_ms));
        if let Some(next) = self.next.take() {
            ctx.change_screen(next);
        }
        Ok(())
    }

    fn on_exit(&mut self, ctx: &mut ScreenContext<'_>) -> WobbleResult<()> {
        let root = ctx.scene.root();
        ctx.scene.destroy(root);
        self.log.borrow_mut().push(format!("exit {}", self.name));
        Ok(())
    }
}

fn registry(log: &Log) -> ScreenRegistry {
    let mut r = ScreenRegistry::new();
    let l = Rc::clone(log);
    r.register("menu", move || {
        Box::new(Recorder {
            name: "menu",
            log: Rc::clone(&l),
            next: Some("game"),
        })
    })
    .unwrap();
    let l = Rc::clone(log);
    r.register("game", move || {
        Box::new(Recorder {
            name: "game",
            log: Rc::clone(&l),
            next: None,
        })
    })
    .unwrap();
    r
}

struct Parts {
    scene: Scene,
    layers: LayerManager,
    textures: TextureStore,
    config: AppConfig,
}

impl Parts {
    fn new() -> Self {
        let config = AppConfig::default();
        Self {
            scene: Scene::new(config.root_rect()),
            layers: LayerManager::new(),
            textures: TextureStore::new(),
            config,
        }
    }

    fn ctx(&mut self) -> ScreenContext<'_> {
        ScreenContext::new(
            &mut self.scene,
            &mut self.layers,
            &mut self.textures,
            &self.config,
        )
    }
}

#[test]
fn registry_rejects_duplicates_and_lists_keys() {
    let log = Log::default();
    let mut r = registry(&log);
    assert!(r.contains("menu"));
    assert_eq!(r.keys().collect::<Vec<_>>(), vec!["game", "menu"]);
    assert!(matches!(
        r.register("menu", || unreachable!()),
        Err(WobbleError::InvalidArgument(_))
    ));
}

#[test]
fn screens_swap_on_request_after_update() {
    let log = Log::default();
    let mut parts = Parts::new();
    let mut manager = ScreenManager::new(registry(&log));

    manager.change("menu", &mut parts.ctx()).unwrap();
    assert_eq!(manager.current_key(), Some("menu"));
    assert_eq!(parts.scene.len(), 2);

    manager
        .update(&mut parts.ctx(), GameTime::new(16.0, 16.0))
        .unwrap();
    assert_eq!(manager.current_key(), Some("game"));
    assert_eq!(parts.scene.len(), 2);

    manager
        .update(&mut parts.ctx(), GameTime::new(16.0, 32.0))
        .unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            "enter menu",
            "update menu 16",
            "exit menu",
            "enter game",
            "update game 32",
        ]
    );
}

#[test]
fn unknown_keys_leave_the_current_screen() {
    let log = Log::default();
    let mut parts = Parts::new();
    let mut manager = ScreenManager::new(registry(&log));
    manager.change("game", &mut parts.ctx()).unwrap();
    assert!(matches!(
        manager.change("credits", &mut parts.ctx()),
        Err(WobbleError::InvalidArgument(_))
    ));
    assert_eq!(manager.current_key(), Some("game"));
    assert_eq!(log.borrow().len(), 1);
}
