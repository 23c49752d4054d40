//! Bug Squash entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement, MouseEvent, TouchEvent};

    use bug_squash::audio::AudioManager;
    use bug_squash::config::LeaderboardConfig;
    use bug_squash::leaderboard::{BoardState, LeaderboardEntry, format_date};
    use bug_squash::platform::{KeyValueStore, LocalStorage, MemoryStore, time};
    use bug_squash::remote::{HttpStore, LeaderboardError, SubmitStatus, refresh, settle_round};
    use bug_squash::sim::{
        EntityKind, RoundConfig, RoundController, RoundError, RoundEvent, RoundPhase, RoundResult,
    };
    use bug_squash::{PlayerIdentity, Settings};

    /// Which panel is showing
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum View {
        Game,
        Board,
    }

    /// Game instance holding all state
    struct Game {
        round: RoundController,
        settings: Settings,
        identity: Option<PlayerIdentity>,
        storage: Box<dyn KeyValueStore>,
        /// Acquired on the first start (browsers need a user gesture)
        audio: Option<AudioManager>,
        board: Rc<RefCell<BoardState>>,
        store: Option<Rc<HttpStore>>,
        submit_status: Rc<RefCell<Option<SubmitStatus>>>,
        view: View,
        last_time: f64,
        /// (fetches completed, loading) of the last board render
        board_rendered: Option<(u32, bool)>,
    }

    impl Game {
        fn new(seed: u64) -> Result<Self, RoundError> {
            let storage: Box<dyn KeyValueStore> = match LocalStorage::open() {
                Some(storage) => Box::new(storage),
                None => {
                    log::warn!("LocalStorage unavailable - display name will not persist");
                    Box::new(MemoryStore::new())
                }
            };
            let settings = Settings::load(storage.as_ref());
            let identity = PlayerIdentity::load(storage.as_ref());
            let config = RoundConfig {
                hit_lock: settings.hit_lock,
                ..Default::default()
            };
            let round = RoundController::new(config, seed)?;
            let store = LeaderboardConfig::load().map(|c| Rc::new(HttpStore::new(c)));

            Ok(Self {
                round,
                settings,
                identity,
                storage,
                audio: None,
                board: Rc::new(RefCell::new(BoardState::new())),
                store,
                submit_status: Rc::new(RefCell::new(None)),
                view: View::Game,
                last_time: 0.0,
                board_rendered: None,
            })
        }

        /// Start button / Enter
        fn start(&mut self) {
            match self.round.start_round(self.identity.as_ref()) {
                Ok(_) => {
                    let audio = self
                        .audio
                        .get_or_insert_with(|| AudioManager::new(&self.settings));
                    audio.resume();
                    *self.submit_status.borrow_mut() = None;
                    self.view = View::Game;
                }
                Err(RoundError::IdentityRequired) => {
                    log::info!("Asking for a display name first");
                    set_hidden("name-modal", false);
                }
                Err(e) => log::error!("Could not start round: {}", e),
            }
        }

        /// Store the prompt's name; false keeps the prompt open
        fn set_identity(&mut self, raw: &str) -> bool {
            match PlayerIdentity::parse(raw) {
                Ok(identity) => {
                    if let Err(e) = identity.save(self.storage.as_ref()) {
                        log::warn!("Could not persist display name: {}", e);
                    }
                    self.identity = Some(identity);
                    true
                }
                Err(e) => {
                    log::info!("{}", e);
                    false
                }
            }
        }

        /// Flip mute and persist it
        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            if let Some(audio) = &mut self.audio {
                audio.apply_settings(&self.settings);
            }
            if let Err(e) = self.settings.save(self.storage.as_ref()) {
                log::warn!("Could not save settings: {}", e);
            }
            log::info!("Sound {}", if self.settings.muted { "off" } else { "on" });
        }

        /// Leave the page: stop timers and release audio
        fn shutdown(&mut self) {
            self.round.abort_round();
            self.round.drain_events();
            self.audio = None;
        }

        /// Advance timers by frame time and react to round events
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;
            self.round.advance(dt);

            for event in self.round.drain_events() {
                match event {
                    RoundEvent::Sound(effect) => {
                        if let Some(audio) = &self.audio {
                            audio.play(effect);
                        }
                    }
                    RoundEvent::Ended(result) => {
                        self.view = View::Board;
                        self.settle(result);
                    }
                    RoundEvent::Started | RoundEvent::Aborted => {}
                }
            }
        }

        /// Submit (if it scored) and refresh, without blocking the loop
        fn settle(&self, result: RoundResult) {
            let Some(store) = self.store.clone() else {
                log::warn!("Leaderboard not configured - round result stays local");
                return;
            };
            let board = self.board.clone();
            let status = self.submit_status.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = settle_round(store.as_ref(), &board, &result).await;
                *status.borrow_mut() = Some(outcome);
            });
        }

        /// Refresh button / first load
        fn refresh_board(&self) {
            let Some(store) = self.store.clone() else {
                let mut board = self.board.borrow_mut();
                board.begin_fetch();
                board.finish_fetch::<LeaderboardError>(Err(LeaderboardError::NotConfigured));
                return;
            };
            let board = self.board.clone();
            wasm_bindgen_futures::spawn_local(async move {
                refresh(store.as_ref(), &board).await;
            });
        }

        /// Convert a client position to arena coordinates
        fn arena_point(arena: &Element, client_x: f32, client_y: f32) -> Vec2 {
            let rect = arena.get_bounding_client_rect();
            Vec2::new(client_x - rect.left() as f32, client_y - rect.top() as f32)
        }

        fn render(&mut self) {
            let document = document();
            self.render_field(&document);
            self.render_hud(&document);

            set_hidden("game-view", self.view != View::Game);
            set_hidden("board-view", self.view != View::Board);

            let board = self.board.borrow();
            let key = (board.fetches_completed(), board.loading);
            if self.board_rendered != Some(key) {
                render_board(&document, &board, self.identity.as_ref());
                self.board_rendered = Some(key);
            }
        }

        fn render_field(&self, document: &Document) {
            let field = self.round.field();
            for kind in [EntityKind::Bug, EntityKind::Decoy] {
                let size = field.size_of(kind);
                for (i, entity) in field.entities(kind).iter().enumerate() {
                    let Some(el) = document.get_element_by_id(&format!("{}-{}", kind.as_str(), i))
                    else {
                        continue;
                    };
                    let _ = el.set_attribute(
                        "style",
                        &format!(
                            "left:{:.1}px;top:{:.1}px;width:{}px;height:{}px",
                            entity.left, entity.top, size, size
                        ),
                    );
                    let squashed = kind == EntityKind::Bug
                        && self.round.is_cooling(kind, i)
                        && !self.settings.reduced_motion;
                    let _ = el.class_list().toggle_with_force("squashed", squashed);
                }
            }
        }

        fn render_hud(&self, document: &Document) {
            let state = self.round.state();
            set_text(document, "hud-score", &state.score.to_string());
            set_text(document, "hud-penalties", &state.penalties.to_string());
            set_text(document, "hud-time", &state.seconds_remaining.to_string());
            if let Some(el) = document.get_element_by_id("hud-penalties") {
                let _ = el.class_list().toggle_with_force("bad", state.penalties > 0);
            }

            let name = self.identity.as_ref().map(|p| p.as_str()).unwrap_or("-");
            set_text(document, "player-name", name);

            let running = state.phase == RoundPhase::Running;
            set_text(
                document,
                "start-btn",
                if running { "Stop" } else { "Start Game" },
            );

            let ended = state.phase == RoundPhase::Ended;
            set_hidden("round-over", !ended);
            if ended {
                set_text(document, "final-score", &state.score.to_string());
                set_text(document, "final-penalties", &state.penalties.to_string());
                let note = match *self.submit_status.borrow() {
                    Some(SubmitStatus::Submitted) => "Your score is now on the board.",
                    Some(SubmitStatus::Skipped) => "Squash at least one bug to make the board.",
                    Some(SubmitStatus::Failed) | None => "",
                };
                set_text(document, "submit-note", note);
            }
        }
    }

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    /// Element with optional class and text (text is never parsed as HTML)
    fn element(document: &Document, tag: &str, class: &str, text: &str) -> Option<Element> {
        let el = document.create_element(tag).ok()?;
        if !class.is_empty() {
            el.set_class_name(class);
        }
        if !text.is_empty() {
            el.set_text_content(Some(text));
        }
        Some(el)
    }

    fn render_board(document: &Document, state: &BoardState, me: Option<&PlayerIdentity>) {
        let status = if state.loading {
            "Loading..."
        } else if let Some(error) = &state.error {
            error.as_str()
        } else if state.board.is_empty() {
            "No scores yet."
        } else {
            ""
        };
        set_text(document, "board-status", status);
        if let Some(el) = document.get_element_by_id("board-status") {
            let _ = el
                .class_list()
                .toggle_with_force("error", state.error.is_some() && !state.loading);
        }

        let is_me = |entry: &LeaderboardEntry| me.is_some_and(|p| p.as_str() == entry.name);

        if let Some(podium) = document.get_element_by_id("podium") {
            podium.set_inner_html("");
            let places = ["1st", "2nd", "3rd"];
            for (i, entry) in state.board.podium().iter().enumerate() {
                let class = if is_me(entry) { "place me" } else { "place" };
                let Some(place) = element(document, "div", class, "") else {
                    continue;
                };
                for (cls, text) in [
                    ("rank", places[i].to_string()),
                    ("name", entry.name.clone()),
                    ("score", format!("Score: {}", entry.score)),
                    ("reg", format!("Reg: {}", entry.penalties)),
                ] {
                    if let Some(child) = element(document, "div", cls, &text) {
                        let _ = place.append_child(&child);
                    }
                }
                let _ = podium.append_child(&place);
            }
        }

        if let Some(rows) = document.get_element_by_id("board-rows") {
            rows.set_inner_html("");
            let now = time::now();
            for (rank, entry) in state.board.table_rows() {
                let class = if is_me(entry) { "me" } else { "" };
                let Some(tr) = element(document, "tr", class, "") else {
                    continue;
                };
                for text in [
                    rank.to_string(),
                    entry.name.clone(),
                    entry.score.to_string(),
                    entry.penalties.to_string(),
                    format_date(&entry.timestamp, now),
                ] {
                    if let Some(td) = element(document, "td", "", &text) {
                        let _ = tr.append_child(&td);
                    }
                }
                let _ = rows.append_child(&tr);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bug Squash starting...");

        let document = document();
        let seed = time::now_ms() as u64;
        let game = match Game::new(seed) {
            Ok(game) => Rc::new(RefCell::new(game)),
            Err(e) => {
                log::error!("Bug Squash failed to start: {}", e);
                return;
            }
        };
        log::info!("Game initialized with seed: {}", seed);

        if let Some(arena) = document.get_element_by_id("arena") {
            build_arena(&document, &arena, &game.borrow().round);
            setup_arena_input(&arena, game.clone());
        } else {
            log::error!("No #arena element");
            return;
        }

        setup_buttons(game.clone());
        setup_name_prompt(game.clone());
        setup_keyboard(game.clone());
        setup_unload(game.clone());

        if game.borrow().identity.is_none() {
            set_hidden("name-modal", false);
        }
        game.borrow().refresh_board();

        request_animation_frame(game);

        log::info!("Bug Squash running!");
    }

    /// Create one element per entity slot
    fn build_arena(document: &Document, arena: &Element, round: &RoundController) {
        let config = round.config();
        for (kind, count) in [
            (EntityKind::Bug, config.bug_count),
            (EntityKind::Decoy, config.decoy_count),
        ] {
            for i in 0..count {
                let Some(el) = element(document, "div", kind.as_str(), "") else {
                    continue;
                };
                el.set_id(&format!("{}-{}", kind.as_str(), i));
                if kind == EntityKind::Decoy {
                    if let Some(code) = element(
                        document,
                        "pre",
                        "",
                        "const value = 42;\nfunction greet() {\n  return \"Hello\";\n}",
                    ) {
                        let _ = el.append_child(&code);
                    }
                }
                let _ = arena.append_child(&el);
            }
        }
    }

    fn setup_arena_input(arena: &Element, game: Rc<RefCell<Game>>) {
        // Mouse: hit-test against positions as they are right now
        {
            let game = game.clone();
            let arena_clone = arena.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = Game::arena_point(
                    &arena_clone,
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
                let outcome = game.borrow_mut().round.register_click(point);
                log::debug!("Click at {:?}: {:?}", point, outcome);
            });
            let _ = arena
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let arena_clone = arena.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let point = Game::arena_point(
                        &arena_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    game.borrow_mut().round.register_click(point);
                }
            });
            let _ = arena
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document().get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("start-btn", move || {
                let mut g = game.borrow_mut();
                if g.round.phase() == RoundPhase::Running {
                    g.round.abort_round();
                } else {
                    g.start();
                }
            });
        }
        {
            let game = game.clone();
            on_click("show-game", move || game.borrow_mut().view = View::Game);
        }
        {
            let game = game.clone();
            on_click("show-board", move || game.borrow_mut().view = View::Board);
        }
        on_click("board-refresh", move || game.borrow().refresh_board());
    }

    fn setup_name_prompt(game: Rc<RefCell<Game>>) {
        let Some(form) = document().get_element_by_id("name-form") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let Some(input) = document()
                .get_element_by_id("name-input")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            if game.borrow_mut().set_identity(&input.value()) {
                input.set_value("");
                set_hidden("name-modal", true);
            } else {
                let _ = input.focus();
            }
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let modal_open = document()
                .get_element_by_id("name-modal")
                .is_some_and(|el| !el.class_list().contains("hidden"));
            if modal_open {
                return;
            }
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "Enter" => g.start(),
                "Escape" => {
                    g.round.abort_round();
                }
                "m" | "M" => g.toggle_mute(),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop every timer and release audio when the page goes away
    fn setup_unload(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().shutdown();
            log::info!("Page hidden - round stopped");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
        }

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
    log::info!("Bug Squash (native) starting...");
    log::info!("The playable build is the web version - run with `trunk serve`");

    if bug_squash::config::LeaderboardConfig::load().is_none() {
        log::info!("Set LEADERBOARD_URL and LEADERBOARD_TOKEN to enable the remote board");
    }

    match demo_round() {
        Ok(result) => println!(
            "Demo round: {} squashed {} bugs with {} regressions",
            result.player, result.score, result.penalties
        ),
        Err(e) => {
            log::error!("Demo round failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one scripted round headless, the way the browser shell drives it
#[cfg(not(target_arch = "wasm32"))]
fn demo_round() -> Result<bug_squash::sim::RoundResult, Box<dyn std::error::Error>> {
    use bug_squash::consts::{BUG_SIZE, STEP_MS};
    use bug_squash::sim::{EntityKind, RoundConfig, RoundController, RoundEvent};
    use bug_squash::{PlayerIdentity, platform::time};

    let player = PlayerIdentity::parse("demo")?;
    let mut round = RoundController::new(RoundConfig::default(), time::now_ms() as u64)?;
    round.start_round(Some(&player))?;

    // Click the centre of a bug every 700ms, and a code block every 3s
    let mut elapsed = 0;
    let mut result = None;
    while result.is_none() {
        if elapsed % 700 == 0 {
            let index = (elapsed / 700) as usize % round.config().bug_count;
            if let Some(bug) = round.field().get(EntityKind::Bug, index) {
                let centre = bug.corner() + glam::Vec2::splat(BUG_SIZE / 2.0);
                round.register_hit_at(EntityKind::Bug, index, centre);
            }
        }
        if elapsed % 3000 == 0 && elapsed > 0 {
            round.register_hit(EntityKind::Decoy, 0);
        }

        round.advance(f64::from(STEP_MS));
        elapsed += STEP_MS;

        result = round.drain_events().into_iter().find_map(|event| match event {
            RoundEvent::Ended(result) => Some(result),
            _ => None,
        });
    }

    result.ok_or_else(|| "round never ended".into())
}
