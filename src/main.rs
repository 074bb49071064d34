//! Cannonade entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use cannonade::Settings;
    use cannonade::audio::{AudioManager, sounds_for};
    use cannonade::consts::*;
    use cannonade::renderer::{CanvasPainter, frame_commands};
    use cannonade::sim::{DemoPilot, GameState, InputEvent, TickInput, tick};
    use cannonade::tuning::Tuning;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        painter: CanvasPainter,
        audio: AudioManager,
        settings: Settings,
        /// Autopilot, when demo mode is on
        pilot: Option<DemoPilot>,
        accumulator: f32,
        last_time: f64,
        /// Inputs gathered since the last tick
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(painter: CanvasPainter, settings: Settings, seed: u64) -> Self {
            let pilot = settings.demo_on_start.then(|| DemoPilot::new(seed));
            Self {
                state: GameState::new(Tuning::default()),
                painter,
                audio: AudioManager::new(&settings),
                settings,
                pilot,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                // Queued host input goes to the first tick of the frame only
                let mut input = std::mem::take(&mut self.input);
                if let Some(pilot) = self.pilot.as_mut() {
                    let pause = input.pause;
                    input = pilot.next_input(&self.state);
                    input.pause = pause;
                }
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                for sound in sounds_for(&self.state.events) {
                    self.audio.play(sound);
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            self.painter.paint(&frame_commands(&self.state));
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud") {
                let class = if self.settings.show_hud { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-balls .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.projectiles.len().to_string()));
            }
            if let Some(el) = document.get_element_by_id("pause-banner") {
                let class = if self.state.paused { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.get_element_by_id("demo-banner") {
                let class = if self.pilot.is_some() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cannonade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let arena = Tuning::default().arena_size;
        canvas.set_width(arena.x as u32);
        canvas.set_height(arena.y as u32);

        let Some(painter) = CanvasPainter::new(&canvas) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(painter, settings, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(game.clone());
        request_animation_frame(game);

        log::info!("Cannonade running!");
    }

    /// Convert a mouse event to play-field coordinates
    fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let scale_x = if rect.width() > 0.0 {
            canvas.width() as f64 / rect.width()
        } else {
            1.0
        };
        let scale_y = if rect.height() > 0.0 {
            canvas.height() as f64 / rect.height()
        } else {
            1.0
        };
        Vec2::new(
            ((event.client_x() as f64 - rect.left()) * scale_x) as f32,
            ((event.client_y() as f64 - rect.top()) * scale_y) as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - aim
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = canvas_point(&canvas_clone, &event);
                game.borrow_mut()
                    .input
                    .events
                    .push(InputEvent::PointerMoved(pos));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.events.push(InputEvent::Fire);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard shortcuts
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "p" | "P" | "Escape" => g.input.toggle_pause(),
                    "i" | "I" => {
                        g.pilot = match g.pilot {
                            Some(_) => None,
                            None => Some(DemoPilot::new(js_sys::Date::now() as u64)),
                        };
                        log::info!("Demo mode: {}", g.pilot.is_some());
                    }
                    "m" | "M" => {
                        let g = &mut *g;
                        g.settings.muted = !g.settings.muted;
                        g.audio.apply_settings(&g.settings);
                        g.settings.save();
                        log::info!("Muted: {}", g.settings.muted);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            // A pause press already queued this frame covers it
            if g.settings.pause_on_blur && !g.state.paused && !g.input.pause {
                g.input.toggle_pause();
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cannonade (native) starting headless demo...");

    let mut args = std::env::args().skip(1).peekable();

    if args.peek().is_some_and(|a| a == "--print-tuning") {
        match cannonade::Tuning::default().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to encode tuning: {}", e),
        }
        return;
    }

    let tuning = match args.next() {
        Some(path) if path != "-" => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| {
                    cannonade::Tuning::from_json(&json).map_err(|e| e.to_string())
                });
            match loaded {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::error!("Could not load {}: {}", path, e);
                    std::process::exit(2);
                }
            }
        }
        _ => cannonade::Tuning::default(),
    };
    let ticks = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(cannonade::consts::DEFAULT_HEADLESS_TICKS);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    let summary = headless::run(tuning, ticks, seed);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use cannonade::audio::sounds_for;
    use cannonade::consts::SIM_DT;
    use cannonade::sim::{DemoPilot, GameEvent, GameState, tick};
    use cannonade::Tuning;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    pub struct Summary {
        pub ticks: u64,
        pub seed: u64,
        pub shots: usize,
        pub wall_impacts: usize,
        pub sounds: usize,
        pub kinetic_energy: f32,
        pub projectiles: Vec<[f32; 3]>,
    }

    /// Drive the autopilot for a fixed number of ticks
    pub fn run(tuning: Tuning, ticks: u64, seed: u64) -> Summary {
        let mut state = GameState::new(tuning);
        let mut pilot = DemoPilot::new(seed);
        let (mut shots, mut wall_impacts, mut sounds) = (0, 0, 0);

        for _ in 0..ticks {
            let input = pilot.next_input(&state);
            tick(&mut state, &input, SIM_DT);

            for event in &state.events {
                match event {
                    GameEvent::Fired { id, angle, .. } => {
                        shots += 1;
                        log::debug!("tick {}: fired {} at {:.2} rad", state.time_ticks, id, angle);
                    }
                    GameEvent::WallImpact { .. } => wall_impacts += 1,
                    GameEvent::Recycled { id } => {
                        log::debug!("tick {}: recycled {}", state.time_ticks, id)
                    }
                }
            }
            sounds += sounds_for(&state.events).count();
        }

        log::info!(
            "{} ticks, {} shots, {} live projectiles",
            state.time_ticks,
            shots,
            state.projectiles.len()
        );

        Summary {
            ticks: state.time_ticks,
            seed,
            shots,
            wall_impacts,
            sounds,
            kinetic_energy: state.kinetic_energy(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| [p.pos.x, p.pos.y, p.radius()])
                .collect(),
        }
    }
}
