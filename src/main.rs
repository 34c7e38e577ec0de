//! Mirror Blocks entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use mirror_blocks::sim::GameEvent;

/// Sound cue name for an event, if it has one
fn cue_for(event: &GameEvent) -> Option<&'static str> {
    use mirror_blocks::sim::FailureReason;
    match event {
        GameEvent::MissionCompleted { .. } => Some("mission"),
        GameEvent::RoundFailed { reason } => Some(match reason {
            FailureReason::Hazard => "fail_hazard",
            FailureReason::BlockCollision => "fail_collision",
            FailureReason::MirrorDivergence => "fail_mirror",
        }),
        GameEvent::RoundCompleted { .. } => Some("round_complete"),
        GameEvent::AllLevelsCompleted { .. } => Some("game_complete"),
        GameEvent::UrgencyChanged { urgent: true } => Some("music_fast"),
        GameEvent::UrgencyChanged { urgent: false } => Some("music_normal"),
        GameEvent::BlocksTransformed => Some("circles"),
        _ => None,
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use mirror_blocks::Tuning;
    use mirror_blocks::platform::{KeyboardState, now_ms};
    use mirror_blocks::sim::{FrameView, GameState, LevelCatalog, tick};

    // Rendering and audio sinks live on the page; both are optional hooks
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            const hooks = window.mirrorBlocks;
            if (hooks && hooks.present) {
                hooks.present(JSON.parse(json));
            }
        }

        export function play_cue(name) {
            const hooks = window.mirrorBlocks;
            if (hooks && hooks.cue) {
                hooks.cue(name);
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
        fn play_cue(name: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        keys: KeyboardState,
    }

    impl Game {
        /// One simulation step per animation frame
        fn frame(&mut self) {
            let input = self.keys.take_input(now_ms());
            if let Err(e) = tick(&mut self.state, &input) {
                log::error!("Simulation error: {}", e);
            }

            for event in self.state.drain_events() {
                log::debug!("Event: {:?}", event);
                if let Some(cue) = super::cue_for(&event) {
                    play_cue(cue);
                }
            }

            match FrameView::capture(&self.state).to_json() {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Frame snapshot failed: {}", e),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Mirror Blocks starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let catalog = match LevelCatalog::standard() {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Level data rejected: {}", e);
                return;
            }
        };
        let state = match GameState::new(Tuning::load(), catalog) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Failed to set up game: {}", e);
                return;
            }
        };
        let game = Rc::new(RefCell::new(Game {
            state,
            keys: KeyboardState::new(),
        }));

        setup_keyboard(&window, game.clone());
        setup_focus_loss(&window, &document, game.clone());

        request_animation_frame(game);

        log::info!("Mirror Blocks running!");
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if game.borrow_mut().keys.key_down(&event.code(), event.repeat()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if game.borrow_mut().keys.key_up(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Key-up events are lost while the page is hidden, so drop held keys
    fn setup_focus_loss(
        window: &web_sys::Window,
        document: &web_sys::Document,
        game: Rc<RefCell<Game>>,
    ) {
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().keys.release_all();
                    log::info!("Keys released (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys.release_all();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mirror Blocks (native) starting...");
    log::info!("Native mode runs a scripted headless round - serve the wasm build to play");

    if let Err(e) = headless::run() {
        log::error!("Headless run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use mirror_blocks::sim::{
        FrameView, GameState, LevelCatalog, RoundPhase, SideInput, TickInput, tick,
    };
    use mirror_blocks::{SimError, Tuning, ticks_to_ms};

    /// Frames to simulate before giving up
    const MAX_FRAMES: u64 = 3600;

    /// Both players steer their first block along the same mirrored path
    fn scripted(frame: u64) -> TickInput {
        let toward_mirror = (1..=40).contains(&frame);
        let down = (90..=150).contains(&frame);
        TickInput {
            now_ms: ticks_to_ms(frame),
            confirm: frame == 0,
            primary: SideInput {
                right: toward_mirror,
                down,
                ..Default::default()
            },
            secondary: SideInput {
                left: toward_mirror,
                down,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn run() -> Result<(), SimError> {
        let mut state = GameState::new(Tuning::load(), LevelCatalog::test_only()?)?;

        for frame in 0..MAX_FRAMES {
            tick(&mut state, &scripted(frame))?;
            for event in state.drain_events() {
                log::info!("[frame {:>4}] {:?}", frame, event);
                if let Some(cue) = super::cue_for(&event) {
                    log::debug!("cue: {}", cue);
                }
            }
            if !matches!(state.phase(), Some(RoundPhase::BeforeStart | RoundPhase::Playing)) {
                break;
            }
        }

        let view = FrameView::capture(&state);
        log::info!(
            "Finished in phase {:?} after {} (mirror {:.1})",
            view.phase,
            view.clock,
            view.mirror.map_or(0.0, |m| m.value)
        );
        for block in view.blocks.iter().filter(|b| !b.missions.is_empty()) {
            log::info!(
                "{:?} {:?} still needs {:?}",
                block.side,
                block.kind,
                block.missions
            );
        }
        Ok(())
    }
}
