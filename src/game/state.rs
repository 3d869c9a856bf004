//! Global app state container.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The page keeps the module alive, so the controller and the mounted
//! mini-game persist across `handle_request` calls for the whole visit.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::GameConfig;
use crate::game::controller::Controller;
use crate::game::minigame::{GameId, MiniGame, MiniGameResult, registry};
use crate::game::session::Session;

/// Where the mounted game's completion callback drops its result.
type Mailbox = Rc<RefCell<Option<(GameId, MiniGameResult)>>>;

pub struct AppState {
    pub controller: Controller,
    mounted: Option<Box<dyn MiniGame>>,
    mailbox: Mailbox,
}

impl AppState {
    pub fn new(config: GameConfig) -> Self {
        Self::from_controller(Controller::new(config))
    }

    fn from_controller(controller: Controller) -> Self {
        Self {
            controller,
            mounted: None,
            mailbox: Rc::new(RefCell::new(None)),
        }
    }

    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    pub fn config(&self) -> &GameConfig {
        self.controller.config()
    }

    pub fn mounted_game(&self) -> Option<GameId> {
        self.mounted.as_ref().map(|g| g.id())
    }

    /// Mount a fresh module for `game`, disposing any previous one first.
    /// Returns teardown markup (if any) followed by the mount markup.
    pub fn mount(&mut self, game: GameId) -> String {
        let mut html = self.unmount();
        let mut module = registry::create(game);
        let mailbox = Rc::clone(&self.mailbox);
        module.on_complete(Box::new(move |id, result| {
            *mailbox.borrow_mut() = Some((id, result));
        }));
        html.push_str(&module.start());
        self.mounted = Some(module);
        log::debug!("mounted {}", game);
        html
    }

    /// Dispose the mounted module. Returns its teardown markup.
    pub fn unmount(&mut self) -> String {
        match self.mounted.take() {
            Some(mut module) => {
                log::debug!("disposed {}", module.id());
                module.dispose()
            }
            None => String::new(),
        }
    }

    /// Hand the page's raw result to the mounted module and collect what
    /// its callback forwarded. `None` means the report was dropped.
    pub fn deliver(&mut self, game: GameId, result: MiniGameResult) -> Option<MiniGameResult> {
        let module = self.mounted.as_mut().filter(|m| m.id() == game)?;
        if !module.report(result) {
            return None;
        }
        self.mailbox.borrow_mut().take().map(|(_, r)| r)
    }
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::new(GameConfig::default()));
}

/// Execute a closure with read access to the app state.
pub fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&AppState) -> R,
{
    STATE.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the app state.
pub fn with_state_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut AppState) -> R,
{
    STATE.with(|s| f(&mut s.borrow_mut()))
}

/// Start over with a new config and a fresh session.
pub fn init_state(config: GameConfig) {
    STATE.with(|s| {
        *s.borrow_mut() = AppState::new(config);
    });
}

/// Swap in a restored session, keeping the current config. Returns the
/// teardown markup of any game that was mounted.
pub fn replace_session(session: Session) -> String {
    STATE.with(|s| {
        let mut state = s.borrow_mut();
        let teardown = state.unmount();
        let config = state.config().clone();
        *state = AppState::from_controller(Controller::with_session(config, session));
        teardown
    })
}
