//! Sentiment Invaders entry point
//!
//! Browser build: exports the game controls to the host page and runs the
//! loop on requestAnimationFrame. Native build: scores comments and plays a
//! headless autopilot game.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, HtmlElement, KeyboardEvent};

    use sentiment_invaders::consts;
    use sentiment_invaders::driver::FrameTicket;
    use sentiment_invaders::ingest::{
        CommentRecord, records_from_listing, records_from_text, source_table, strip_subreddit_prefix,
    };
    use sentiment_invaders::platform::clock::PerformanceClock;
    use sentiment_invaders::platform::{Button, ControlScheme, SharedClock};
    use sentiment_invaders::renderer::{Canvas2d, HudModel};
    use sentiment_invaders::sentiment::{analyze, score_segments};
    use sentiment_invaders::session::LaunchOptions;
    use sentiment_invaders::sim::Phase;
    use sentiment_invaders::{Difficulty, GameData, GameError, Session, Settings, Tuning};

    thread_local! {
        static SESSION: RefCell<Session> = RefCell::new(Session::new());
    }

    fn to_js(e: GameError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("Logger already initialized");
        }

        log::info!("Sentiment Invaders starting...");

        if let Some(document) = document() {
            setup_keyboard(&document);
            setup_touch_buttons(&document);
            setup_auto_pause();
        }
    }

    /// Build a game on the given canvas and start the loop. `tuning_json`
    /// optionally overrides parts of the balance tables.
    #[wasm_bindgen]
    pub fn start_game(
        canvas_id: &str,
        game_data_json: &str,
        difficulty: &str,
        tuning_json: Option<String>,
    ) -> Result<(), JsValue> {
        let data = GameData::from_json(game_data_json).map_err(to_js)?;
        let tuning = match tuning_json.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => Tuning::from_json(json).map_err(to_js)?,
            _ => Tuning::default(),
        };
        let canvas = Canvas2d::from_element_id(canvas_id).map_err(to_js)?;
        canvas.resize(consts::CANVAS_WIDTH as u32, consts::CANVAS_HEIGHT as u32);

        let mut settings = Settings::load();
        if !difficulty.is_empty() {
            settings.difficulty = Difficulty::resolve(difficulty);
            settings.save();
        }

        let scheme = detect_scheme(&settings);
        show_controls(scheme);

        let clock: SharedClock = Rc::new(PerformanceClock::new());
        let options = LaunchOptions {
            difficulty: settings.difficulty,
            tuning,
            scheme,
            paint: settings.paint_options(),
            seed: js_sys::Date::now() as u64,
        };
        let ticket = SESSION
            .with(|s| {
                s.borrow_mut()
                    .start_game(&data, Box::new(canvas), clock, options)
            })
            .map_err(to_js)?;
        schedule(ticket);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn restart_game() {
        if let Some(ticket) = SESSION.with(|s| s.borrow_mut().restart()) {
            schedule(ticket);
        }
    }

    #[wasm_bindgen]
    pub fn toggle_pause() {
        SESSION.with(|s| s.borrow_mut().toggle_pause());
    }

    #[wasm_bindgen]
    pub fn stop_game() {
        SESSION.with(|s| s.borrow_mut().cleanup());
    }

    /// Lexicon analysis of one text, as JSON
    #[wasm_bindgen]
    pub fn score_text(text: &str) -> Result<String, JsValue> {
        serde_json::to_string(&analyze(text)).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Scored comment records from a subreddit listing, as JSON
    #[wasm_bindgen]
    pub fn score_listing(listing_json: &str, subreddit: &str) -> Result<String, JsValue> {
        let name = strip_subreddit_prefix(subreddit).map_err(to_js)?;
        let records = records_from_listing(listing_json, &name).map_err(to_js)?;
        serde_json::to_string(&score_segments(records)).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Scored comment records from pasted text (one per line), as JSON
    #[wasm_bindgen]
    pub fn score_pasted(text: &str) -> Result<String, JsValue> {
        serde_json::to_string(&score_segments(records_from_text(text)))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Per-citation sentiment counts for scored records (JSON array in and out)
    #[wasm_bindgen]
    pub fn citation_table(scored_json: &str) -> Result<String, JsValue> {
        let records: Vec<CommentRecord> = serde_json::from_str(scored_json)
            .map_err(|e| to_js(GameError::InvalidGameData(e.to_string())))?;
        serde_json::to_string(&source_table(&records)).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn schedule(ticket: FrameTicket) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |now: f64| {
            game_loop(ticket, now);
        });
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed");
        }
        closure.forget();
    }

    fn game_loop(ticket: FrameTicket, now: f64) {
        let hud = SESSION.with(|s| {
            let mut session = s.borrow_mut();
            if session.frame(ticket, now) {
                session.hud()
            } else {
                None
            }
        });

        // Stale ticket: this chain ends here
        if let Some(hud) = hud {
            write_hud(&hud);
            schedule(ticket);
        }
    }

    fn detect_scheme(settings: &Settings) -> ControlScheme {
        let Some(window) = web_sys::window() else {
            return ControlScheme::Keyboard;
        };
        let has_touch = window.navigator().max_touch_points() > 0
            || js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(consts::DESKTOP_MIN_WIDTH + 1.0);
        log::debug!("Control preference: {}", settings.controls.as_str());
        ControlScheme::from_preference(settings.controls, has_touch, width)
    }

    fn set_display(document: &Document, id: &str, display: &str) {
        if let Some(el) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("display", display);
        }
    }

    fn show_controls(scheme: ControlScheme) {
        let Some(document) = document() else {
            return;
        };
        let touch = scheme == ControlScheme::Touch;
        set_display(&document, "touchControls", if touch { "flex" } else { "none" });
        set_display(&document, "keyboardInstructions", if touch { "none" } else { "block" });
    }

    /// An editable control has focus
    fn is_typing(document: &Document) -> bool {
        document.active_element().is_some_and(|el| {
            matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
                || el
                    .dyn_ref::<HtmlElement>()
                    .is_some_and(|h| h.is_content_editable())
        })
    }

    fn setup_keyboard(document: &Document) {
        for (name, pressed) in [("keydown", true), ("keyup", false)] {
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let typing = is_typing(&doc);
                let key = event.key();
                let handled = SESSION.with(|s| {
                    s.borrow_mut().input_mut().is_some_and(|input| {
                        if pressed {
                            input.key_down(&key, typing)
                        } else {
                            input.key_up(&key, typing)
                        }
                    })
                });
                if handled {
                    event.prevent_default();
                }
            });
            let _ = document.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_buttons(document: &Document) {
        const EVENTS: [(&str, bool); 5] = [
            ("touchstart", true),
            ("mousedown", true),
            ("touchend", false),
            ("mouseup", false),
            ("mouseleave", false),
        ];

        for button in [Button::Left, Button::Right, Button::Shoot] {
            let Some(el) = document.get_element_by_id(button.element_id()) else {
                continue;
            };
            for (name, pressed) in EVENTS {
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    SESSION.with(|s| {
                        if let Some(input) = s.borrow_mut().input_mut() {
                            if pressed {
                                input.button_down(button);
                            } else {
                                input.button_up(button);
                            }
                        }
                    });
                    if pressed {
                        event.prevent_default();
                    }
                });
                let _ = el.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
        log::debug!("Touch controls wired");
    }

    fn setup_auto_pause() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            SESSION.with(|s| {
                let mut session = s.borrow_mut();
                if session.snapshot().is_some_and(|snap| snap.phase == Phase::Running) {
                    session.toggle_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_disabled(document: &Document, id: &str, disabled: bool) {
        if let Some(btn) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        {
            if btn.disabled() != disabled {
                btn.set_disabled(disabled);
            }
        }
    }

    /// Update HUD elements in DOM
    fn write_hud(hud: &HudModel) {
        let Some(document) = document() else {
            return;
        };

        set_text(&document, "gameScore", &hud.score);
        set_text(&document, "gameHealth", &hud.health);
        set_text(&document, "gameTime", &hud.time);

        if let Some(el) = document
            .get_element_by_id("weaponStatus")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            el.set_text_content(Some(&hud.weapon_label));
            let _ = el
                .style()
                .set_property("background-color", hud.weapon_badge_color());
        }

        if let Some(el) = document.get_element_by_id("killProgress") {
            let html = hud
                .kill_progress
                .iter()
                .map(|p| format!("<span style=\"color: {};\">{}</span>", p.color, p.text()))
                .collect::<Vec<_>>()
                .join(" | ");
            el.set_inner_html(&html);
        }

        set_disabled(&document, "restartGameBtn", !hud.restart_enabled);
        set_disabled(&document, "playGameBtn", !hud.play_enabled);

        if let Some(el) = document
            .get_element_by_id("pauseGameBtn")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            if hud.pause_visible {
                let _ = el.style().set_property("display", "inline-block");
                el.set_text_content(Some(hud.pause_label));
            } else if hud.restart_enabled {
                let _ = el.style().set_property("display", "none");
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io::{IsTerminal, Read};
    use std::rc::Rc;

    use sentiment_invaders::ingest::{CommentRecord, records_from_text};
    use sentiment_invaders::platform::{ManualClock, SharedClock};
    use sentiment_invaders::renderer::RecordingSurface;
    use sentiment_invaders::session::LaunchOptions;
    use sentiment_invaders::{GameData, GameError, Session, Settings, Tuning};

    /// ~60 fps
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 36_000;

    const SAMPLES: &[&str] = &[
        "This is a great idea, love it!",
        "Terrible take, worst thing I've read all week",
        "I moved here last year",
        "Not good. Not good at all.",
        "The mods are doing an AMAZING job 🎉",
        "Honestly this is so boring and awful",
        "Does anyone know when the store opens?",
        "Really happy with how this turned out",
    ];

    /// Lines from stdin when piped, otherwise the built-in samples
    pub fn read_records() -> Vec<CommentRecord> {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            let mut text = String::new();
            match stdin.lock().read_to_string(&mut text) {
                Ok(_) => {
                    let records = records_from_text(&text);
                    if !records.is_empty() {
                        return records;
                    }
                    log::warn!("No comments on stdin, using samples");
                }
                Err(e) => log::warn!("Failed to read stdin: {}", e),
            }
        }
        records_from_text(&SAMPLES.join("\n"))
    }

    /// Balance overrides from a JSON file, or the shipped tables
    pub fn load_tuning(path: Option<&str>) -> Result<Tuning, GameError> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path)
            .map_err(|e| GameError::InvalidTuning(format!("{}: {}", path, e)))?;
        log::info!("Loading tuning overrides from {}", path);
        Tuning::from_json(&json)
    }

    pub fn play_headless(records: Vec<CommentRecord>, tuning: Tuning) -> bool {
        let settings = Settings::load();
        let clock = Rc::new(ManualClock::new(0.0));
        let shared: SharedClock = clock.clone();
        let data = GameData::single(records, Some("Manual".into()));

        let mut session = Session::new();
        let options = LaunchOptions {
            difficulty: settings.difficulty,
            tuning,
            paint: settings.paint_options(),
            seed: 7,
            ..LaunchOptions::default()
        };
        let ticket = match session.start_game(&data, Box::new(RecordingSurface::new()), shared, options) {
            Ok(ticket) => ticket,
            Err(e) => {
                log::error!("Could not start game: {}", e);
                return false;
            }
        };
        if let Some(driver) = session.driver_mut() {
            driver.set_autopilot(true);
        }

        for _ in 0..MAX_FRAMES {
            let now = clock.advance(FRAME_MS);
            session.frame(ticket, now);
            if session.snapshot().is_some_and(|s| s.game_over) {
                break;
            }
        }

        let Some(snap) = session.snapshot() else {
            return false;
        };
        if !snap.game_over {
            log::warn!("Autopilot did not finish within {} frames", MAX_FRAMES);
        }
        log::info!(
            "{} in {}: {}/{} ({}%) - {}",
            if snap.victory { "Victory" } else { "Defeat" },
            snap.formatted_time,
            snap.score,
            snap.max_possible_score,
            snap.score_percentage,
            snap.performance_rating
        );
        session.cleanup();
        snap.game_over
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sentiment Invaders (native) starting...");

    let tuning_path = std::env::args().nth(1);
    let tuning = match native::load_tuning(tuning_path.as_deref()) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let scored = sentiment_invaders::sentiment::score_segments(native::read_records());
    for record in &scored {
        println!(
            "{:>8} {:>+6.2}  {}",
            record.sentiment().as_str(),
            record.score.unwrap_or(0.0),
            record.text
        );
    }

    if !native::play_headless(scored, tuning) {
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
